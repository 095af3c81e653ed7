//! Subcommand parsing and dispatch

use std::path::{Path, PathBuf};

use meishi_cards::share::{
    format_phone_number, is_valid_email, is_valid_url, map_search_url, mailto_uri,
    normalize_website_url, qr_target, share_text, share_url, tel_uri,
};
use meishi_cards::{BusinessCard, CardManager, CardPreview, FieldKind, PhotoStore, Privacy};
use meishi_core::{AppContext, ColorTheme, Config};
use meishi_stocks::{DEFAULT_NEWS_DAYS, StockContext, WatchlistItem, data_source_from_config};
use nu_ansi_term::Color;
use tracing::{debug, info, warn};

use crate::error::{CliError, Result};

/// Options for `card new`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCard {
    pub name: String,
    pub address: Option<String>,
    pub fields: Vec<(FieldKind, String, String)>,
    pub privacy: Option<Privacy>,
    pub theme: Option<ColorTheme>,
    pub template_id: Option<u32>,
    pub photo: Option<PathBuf>,
}

/// A parsed subcommand
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CardNew(NewCard),
    CardShow { id: String },
    CardList { json: bool },
    CardDelete { id: String },
    CardShare { id: String },
    CardCollect { id: String },
    CardCollection,
    AccountShow,
    AccountLink { provider: String },
    StockPrice { ticker: String },
    StockDiagnosis { ticker: String },
    StockAnalyze { ticker: String, question: Option<String> },
    StockNews { query: String, days: u32 },
    StockKeyword,
    WatchlistList,
    WatchlistAdd { ticker: String, company_name: String, memo: Option<String> },
    WatchlistMemo { id: i64, memo: String },
    WatchlistRemove { id: i64 },
    PrefsShow,
    PrefsTheme { theme: ColorTheme },
    PrefsLanguage { language: String },
}

fn usage(message: impl Into<String>) -> CliError {
    CliError::Usage(message.into())
}

/// Joined trailing words, or `None` when there are none
fn rest_text(words: &[&str]) -> Option<String> {
    let text = words.join(" ");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| usage(format!("watchlist id must be a number: {}", raw)))
}

/// Parse the arguments following the program name
pub fn parse_command(args: &[String]) -> Result<Command> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let command = match args.as_slice() {
        ["card", "new", rest @ ..] => Command::CardNew(parse_new_card(rest)?),
        ["card", "show", id] => Command::CardShow { id: id.to_string() },
        ["card", "list"] => Command::CardList { json: false },
        ["card", "list", "--json"] => Command::CardList { json: true },
        ["card", "delete", id] => Command::CardDelete { id: id.to_string() },
        ["card", "share", id] => Command::CardShare { id: id.to_string() },
        ["card", "collect", id] => Command::CardCollect { id: id.to_string() },
        ["card", "collection"] => Command::CardCollection,

        ["account"] | ["account", "show"] => Command::AccountShow,
        ["account", "link", provider] => Command::AccountLink {
            provider: provider.to_string(),
        },

        ["stock", "price", ticker] => Command::StockPrice {
            ticker: ticker.to_string(),
        },
        ["stock", "diagnosis", ticker] => Command::StockDiagnosis {
            ticker: ticker.to_string(),
        },
        ["stock", "analyze", ticker, question @ ..] => Command::StockAnalyze {
            ticker: ticker.to_string(),
            question: rest_text(question),
        },
        ["stock", "news", query] => Command::StockNews {
            query: query.to_string(),
            days: DEFAULT_NEWS_DAYS,
        },
        ["stock", "news", query, days] => Command::StockNews {
            query: query.to_string(),
            days: days
                .parse()
                .map_err(|_| usage(format!("days must be a positive number: {}", days)))?,
        },
        ["stock", "keyword"] => Command::StockKeyword,

        ["watchlist"] | ["watchlist", "list"] => Command::WatchlistList,
        ["watchlist", "add", ticker, company_name, memo @ ..] => Command::WatchlistAdd {
            ticker: ticker.to_string(),
            company_name: company_name.to_string(),
            memo: rest_text(memo),
        },
        ["watchlist", "memo", id, memo @ ..] => Command::WatchlistMemo {
            id: parse_id(id)?,
            memo: memo.join(" "),
        },
        ["watchlist", "remove", id] => Command::WatchlistRemove { id: parse_id(id)? },

        ["prefs"] | ["prefs", "show"] => Command::PrefsShow,
        ["prefs", "theme", theme] => Command::PrefsTheme {
            theme: theme
                .parse()
                .map_err(|_| usage(format!("theme must be blue or pink: {}", theme)))?,
        },
        ["prefs", "language", language] => Command::PrefsLanguage {
            language: language.to_string(),
        },

        [] => return Err(usage("no command given")),
        other => return Err(usage(format!("unknown command: {}", other.join(" ")))),
    };

    Ok(command)
}

/// `--phone work=010-1234-5678`; a bare value is labelled with the field kind
fn parse_field(kind: FieldKind, raw: &str) -> (FieldKind, String, String) {
    match raw.split_once('=') {
        Some((label, value)) => (kind, label.trim().to_string(), value.trim().to_string()),
        None => (kind, kind.as_str().to_string(), raw.trim().to_string()),
    }
}

fn parse_new_card(args: &[&str]) -> Result<NewCard> {
    let mut card = NewCard::default();
    let mut name_words = Vec::new();
    let mut iter = args.iter();

    while let Some(&arg) = iter.next() {
        if !arg.starts_with("--") {
            name_words.push(arg);
            continue;
        }

        let value = *iter
            .next()
            .ok_or_else(|| usage(format!("{} needs a value", arg)))?;

        match arg {
            "--phone" => card.fields.push(parse_field(FieldKind::Phone, value)),
            "--email" => card.fields.push(parse_field(FieldKind::Email, value)),
            "--website" => card.fields.push(parse_field(FieldKind::Website, value)),
            "--fax" => card.fields.push(parse_field(FieldKind::Fax, value)),
            "--address" => card.address = Some(value.to_string()),
            "--photo" => card.photo = Some(PathBuf::from(value)),
            "--privacy" => {
                card.privacy = Some(value.parse().map_err(|_| {
                    usage(format!("privacy must be public, link_only or private: {}", value))
                })?)
            }
            "--theme" => {
                card.theme = Some(
                    value
                        .parse()
                        .map_err(|_| usage(format!("theme must be blue or pink: {}", value)))?,
                )
            }
            "--template" => {
                card.template_id = Some(
                    value
                        .parse()
                        .map_err(|_| usage(format!("template must be a number: {}", value)))?,
                )
            }
            other => return Err(usage(format!("unknown option: {}", other))),
        }
    }

    card.name = name_words.join(" ");
    if card.name.trim().is_empty() {
        return Err(usage("card new needs a name"));
    }
    Ok(card)
}

/// Run a parsed command
pub async fn run(config: &Config, command: Command) -> Result<()> {
    match command {
        Command::CardNew(new) => card_new(config, new).await,
        Command::CardShow { id } => {
            let manager = open_cards(config)?;
            let account = manager.current_account().await?;
            let card = manager.view_shared(&id, Some(account.uid.as_str())).await?;
            print_card(&card, &config.cards.public_base_url);
            Ok(())
        }
        Command::CardList { json } => {
            let manager = open_cards(config)?;
            let account = manager.current_account().await?;
            let cards = manager.list_for_user(&account.uid).await?;
            print_previews("내 명함", &cards, json)
        }
        Command::CardDelete { id } => {
            let manager = open_cards(config)?;
            let account = manager.current_account().await?;
            manager.delete(&id, &account).await?;
            println!("Deleted card {}", id);
            Ok(())
        }
        Command::CardShare { id } => {
            let manager = open_cards(config)?;
            let account = manager.current_account().await?;
            let card = manager.view_shared(&id, Some(account.uid.as_str())).await?;
            let base = &config.cards.public_base_url;
            println!("{}", Color::Cyan.bold().paint(share_text(card.name())));
            println!("  link: {}", share_url(base, &id));
            println!("  qr:   {}", qr_target(base, &id));
            if card.privacy() == Privacy::Private {
                println!("  {}", Color::Yellow.paint("private: only you can open this link"));
            }
            Ok(())
        }
        Command::CardCollect { id } => {
            let manager = open_cards(config)?;
            let account = manager.current_account().await?;
            manager.collect(&account, &id).await?;
            println!("Saved card {} to your collection", id);
            Ok(())
        }
        Command::CardCollection => {
            let manager = open_cards(config)?;
            let account = manager.current_account().await?;
            let cards = manager.collection(&account.uid).await?;
            print_previews("받은 명함", &cards, false)
        }
        Command::AccountShow => {
            let manager = open_cards(config)?;
            let account = manager.current_account().await?;
            println!("uid:       {}", account.uid);
            println!("anonymous: {}", account.is_anonymous);
            println!(
                "linked:    {}",
                account.linked_account_type.as_deref().unwrap_or("-")
            );
            Ok(())
        }
        Command::AccountLink { provider } => {
            let manager = open_cards(config)?;
            let account = manager.current_account().await?;
            let account = manager.link_account(&account.uid, &provider).await?;
            println!("Linked {} with {}", account.uid, provider);
            Ok(())
        }

        Command::StockPrice { .. }
        | Command::StockDiagnosis { .. }
        | Command::StockAnalyze { .. }
        | Command::StockNews { .. }
        | Command::StockKeyword
        | Command::WatchlistList
        | Command::WatchlistAdd { .. }
        | Command::WatchlistMemo { .. }
        | Command::WatchlistRemove { .. } => run_stock(config, command).await,

        Command::PrefsShow => {
            let prefs = AppContext::load(&config.app.preferences_path);
            println!("theme:    {}", prefs.theme());
            println!("language: {}", prefs.language());
            Ok(())
        }
        Command::PrefsTheme { theme } => {
            let mut prefs = AppContext::load(&config.app.preferences_path);
            prefs.set_theme(theme)?;
            println!("Theme set to {}", theme);
            Ok(())
        }
        Command::PrefsLanguage { language } => {
            let mut prefs = AppContext::load(&config.app.preferences_path);
            prefs.set_language(language)?;
            println!("Language set to {}", prefs.language());
            Ok(())
        }
    }
}

fn open_cards(config: &Config) -> Result<CardManager> {
    let db_path = Path::new(&config.cards.db_path);
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(meishi_core::Error::from)?;
        }
    }
    Ok(CardManager::new(&config.cards.db_path)?)
}

async fn card_new(config: &Config, new: NewCard) -> Result<()> {
    let manager = open_cards(config)?;
    let account = manager.current_account().await?;
    let prefs = AppContext::load(&config.app.preferences_path);

    let mut card = manager
        .create_draft(&account)
        .with_name(new.name)
        .with_color_theme(new.theme.unwrap_or(prefs.theme()));

    if let Some(address) = new.address {
        card = card.with_address(address);
    }
    if let Some(privacy) = new.privacy {
        card = card.with_privacy(privacy);
    }
    if let Some(template_id) = new.template_id {
        card = card.with_template_id(template_id);
    }

    for (kind, label, value) in new.fields {
        match kind {
            FieldKind::Email if !is_valid_email(&value) => warn!("Email looks invalid: {}", value),
            FieldKind::Website if !is_valid_url(&value) => warn!("Website looks invalid: {}", value),
            _ => {}
        }
        if !card.add_field(kind, label, &value) {
            warn!("Already {} {} entries, skipping {}", card.fields(kind).len(), kind, value);
        }
    }

    card.validate()?;

    if let Some(path) = new.photo {
        let bytes = tokio::fs::read(&path).await.map_err(meishi_core::Error::from)?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("photo");
        let photos = PhotoStore::new(&config.cards.photo_dir, &config.cards.public_base_url);
        let url = photos.upload(&account.uid, filename, &bytes).await?;
        card = card.with_photo_url(url);
    }

    let saved = manager.save(card, &account).await?;
    info!("Created card {}", saved.id().unwrap_or_default());
    print_card(&saved, &config.cards.public_base_url);
    Ok(())
}

async fn run_stock(config: &Config, command: Command) -> Result<()> {
    let mut ctx = StockContext::new(data_source_from_config(&config.stocks)?);
    if ctx.is_demo() {
        eprintln!(
            "{}",
            Color::Yellow.paint("데모 모드: STOCK_API_URL 을 설정하면 실제 데이터를 볼 수 있습니다")
        );
    }

    match command {
        Command::StockPrice { ticker } => {
            ctx.select_ticker(&ticker)?;
            let ticker = ctx.selected_ticker().unwrap_or_default().to_string();
            let price = ctx.source().get_stock_price(&ticker).await?;
            let change = format!("{:+.2}%", price.change_percent);
            let change = if price.change_percent >= 0.0 {
                Color::Red.paint(change)
            } else {
                Color::Blue.paint(change)
            };
            println!(
                "{}  {:.2}  {}  vol {}",
                Color::Cyan.bold().paint(&price.ticker),
                price.current_price,
                change,
                price.volume
            );
        }
        Command::StockDiagnosis { ticker } => {
            ctx.select_ticker(&ticker)?;
            let ticker = ctx.selected_ticker().unwrap_or_default().to_string();
            let diagnosis = ctx.source().get_company_diagnosis(&ticker).await?;
            println!("{}", diagnosis.diagnosis);
            debug!("Diagnosis tools: {:?}", diagnosis.tools_used);
        }
        Command::StockAnalyze { ticker, question } => {
            ctx.select_ticker(&ticker)?;
            let ticker = ctx.selected_ticker().unwrap_or_default().to_string();
            let result = ctx
                .source()
                .analyze_stock(&ticker, question.as_deref())
                .await?;
            if !result.success {
                warn!("Analysis for {} reported failure", ticker);
            }
            println!("{}", result.answer);
        }
        Command::StockNews { query, days } => {
            let report = ctx.source().search_news(&query, days).await?;
            println!(
                "{} ({}건, 감성 {:+.2})",
                Color::Cyan.bold().paint(&report.query),
                report.article_count,
                report.overall_sentiment
            );
            for article in &report.articles {
                println!("  [{}] {} - {}", article.sentiment, article.title, article.source);
            }
        }
        Command::StockKeyword => {
            let keyword = ctx.source().get_daily_keyword().await?;
            println!("{} ({})", Color::Cyan.bold().paint(&keyword.keyword), keyword.sentiment);
            println!("{}", keyword.description);
        }
        Command::WatchlistList => {
            let watchlist = ctx.refresh_watchlist().await?;
            if watchlist.is_empty() {
                println!("관심 목록이 비어 있습니다");
            }
            for item in watchlist.iter() {
                print_watchlist_item(item);
            }
        }
        Command::WatchlistAdd {
            ticker,
            company_name,
            memo,
        } => {
            let item = ctx.add(&ticker, &company_name, memo.as_deref()).await?;
            print_watchlist_item(&item);
        }
        Command::WatchlistMemo { id, memo } => {
            let item = ctx.update_memo(id, &memo).await?;
            print_watchlist_item(&item);
        }
        Command::WatchlistRemove { id } => {
            ctx.remove(id).await?;
            println!("Removed watchlist item {}", id);
        }
        other => return Err(usage(format!("not a stock command: {:?}", other))),
    }

    Ok(())
}

fn print_card(card: &BusinessCard, base_url: &str) {
    println!("{}", Color::Cyan.bold().paint(card.name()));
    if let Some(id) = card.id() {
        println!("  id:       {}", id);
    }
    println!(
        "  style:    Template {} / {} / {}",
        card.template_id(),
        card.color_theme(),
        card.privacy()
    );
    if !card.photo_url().is_empty() {
        println!("  photo:    {}", card.photo_url());
    }
    if !card.address().is_empty() {
        println!("  address:  {} ({})", card.address(), map_search_url(card.address()));
    }
    for field in card.phones() {
        println!(
            "  phone:    {} {} ({})",
            field.label,
            format_phone_number(&field.value),
            tel_uri(&field.value)
        );
    }
    for field in card.emails() {
        println!("  email:    {} {} ({})", field.label, field.value, mailto_uri(&field.value));
    }
    for field in card.websites() {
        println!("  website:  {} {}", field.label, normalize_website_url(&field.value));
    }
    for field in card.faxes() {
        println!("  fax:      {} {}", field.label, format_phone_number(&field.value));
    }
    if let Some(id) = card.id() {
        println!("  share:    {}", share_url(base_url, id));
    }
}

fn print_previews(title: &str, cards: &[BusinessCard], json: bool) -> Result<()> {
    let previews: Vec<CardPreview> = cards.iter().map(BusinessCard::preview).collect();

    if json {
        let out = serde_json::to_string_pretty(&previews).map_err(meishi_core::Error::from)?;
        println!("{}", out);
        return Ok(());
    }

    println!("{} ({})", Color::Cyan.bold().paint(title), previews.len());
    for preview in &previews {
        println!(
            "  {:<36}  {:<20}  {:<15}  {}",
            preview.id.as_deref().unwrap_or("-"),
            preview.name,
            preview.primary_phone.as_deref().unwrap_or("-"),
            preview.template_label()
        );
    }
    Ok(())
}

fn print_watchlist_item(item: &WatchlistItem) {
    let price = item
        .current_price
        .map(|p| format!("{:.2}", p))
        .unwrap_or_else(|| "-".to_string());
    let change = item
        .change_percent
        .map(|c| format!("{:+.2}%", c))
        .unwrap_or_default();
    println!(
        "  #{:<3} {:<8} {:<24} {:>10} {:>8}  {}",
        item.id,
        item.ticker,
        item.company_name,
        price,
        change,
        item.memo.as_deref().unwrap_or("")
    );
}
