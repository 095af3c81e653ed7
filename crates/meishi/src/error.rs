//! エラー型定義 (meishi)

use std::fmt;

use meishi_stocks::StockError;

/// meishi バイナリの統合エラー型
///
/// 各ライブラリクレートのエラー型を統合して扱います
#[derive(Debug)]
pub enum CliError {
    /// Core / card error
    Core(meishi_core::Error),
    /// Stock client error
    Stock(StockError),
    /// Bad command line
    Usage(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core(e) => write!(f, "{}", e),
            Self::Stock(e) => write!(f, "{}", e),
            Self::Usage(e) => write!(f, "Usage error: {}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<meishi_core::Error> for CliError {
    fn from(e: meishi_core::Error) -> Self {
        Self::Core(e)
    }
}

impl From<StockError> for CliError {
    fn from(e: StockError) -> Self {
        Self::Stock(e)
    }
}

impl CliError {
    /// Whether retrying later might succeed
    pub fn is_backend(&self) -> bool {
        match self {
            Self::Core(e) => e.is_backend(),
            Self::Stock(e) => match e {
                StockError::NotFound(_) | StockError::Rejected(_) | StockError::Config(_) => false,
                StockError::Core(inner) => inner.is_backend(),
                _ => true,
            },
            Self::Usage(_) => false,
        }
    }
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, CliError>;
