//! Business card data model

use chrono::{DateTime, Duration, Utc};
use meishi_core::{ColorTheme, Error, FieldList, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

use crate::record::CardRecord;

/// Maximum number of entries in each contact field list
pub const MAX_DYNAMIC_FIELDS: usize = 3;

/// Default template selector for new cards
pub const DEFAULT_TEMPLATE_ID: u32 = 1;

/// One labelled contact channel entry, e.g. `mobile` / `555-0100`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicField {
    pub label: String,
    pub value: String,
}

impl DynamicField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Contact field list capped at [`MAX_DYNAMIC_FIELDS`]
pub type DynamicFieldList = FieldList<DynamicField>;

/// Which of the four contact lists an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Phone,
    Email,
    Website,
    Fax,
}

impl FieldKind {
    pub const ALL: [FieldKind; 4] = [Self::Phone, Self::Email, Self::Website, Self::Fax];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Website => "website",
            Self::Fax => "fax",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Part of a [`DynamicField`] replaced by an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPart {
    Label,
    Value,
}

/// Visibility policy, enforced by the backend rather than the model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privacy {
    #[default]
    Public,
    LinkOnly,
    Private,
}

impl Privacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::LinkOnly => "link_only",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Privacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Privacy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "link_only" | "link-only" => Ok(Self::LinkOnly),
            "private" => Ok(Self::Private),
            other => Err(Error::ValidationFailed(format!("unknown privacy level: {}", other))),
        }
    }
}

/// A contact field as accepted by [`CardOptions`]
///
/// Already-built fields pass through unchanged; plain records are read
/// leniently, with missing keys treated as empty strings.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    Field(DynamicField),
    Record(JsonValue),
}

impl FieldInput {
    pub fn into_field(self) -> DynamicField {
        match self {
            Self::Field(field) => field,
            Self::Record(value) => {
                let text = |key: &str| match value.get(key) {
                    Some(JsonValue::String(s)) => s.clone(),
                    Some(JsonValue::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                };
                DynamicField::new(text("label"), text("value"))
            }
        }
    }
}

impl From<DynamicField> for FieldInput {
    fn from(field: DynamicField) -> Self {
        Self::Field(field)
    }
}

impl From<JsonValue> for FieldInput {
    fn from(value: JsonValue) -> Self {
        Self::Record(value)
    }
}

impl<L: Into<String>, V: Into<String>> From<(L, V)> for FieldInput {
    fn from((label, value): (L, V)) -> Self {
        Self::Field(DynamicField::new(label, value))
    }
}

fn normalize_fields(inputs: Vec<FieldInput>) -> DynamicFieldList {
    FieldList::from_iter_bounded(
        inputs.into_iter().map(FieldInput::into_field),
        MAX_DYNAMIC_FIELDS,
    )
}

/// Construction options for [`BusinessCard`]; every option has a default
#[derive(Debug, Clone, PartialEq)]
pub struct CardOptions {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub name: String,
    pub photo_url: String,
    pub address: String,
    pub phones: Vec<FieldInput>,
    pub emails: Vec<FieldInput>,
    pub websites: Vec<FieldInput>,
    pub faxes: Vec<FieldInput>,
    pub template_id: u32,
    pub color_theme: ColorTheme,
    pub privacy: Privacy,
    pub is_anonymous: bool,
    pub linked_account_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            id: None,
            user_id: None,
            name: String::new(),
            photo_url: String::new(),
            address: String::new(),
            phones: Vec::new(),
            emails: Vec::new(),
            websites: Vec::new(),
            faxes: Vec::new(),
            template_id: DEFAULT_TEMPLATE_ID,
            color_theme: ColorTheme::default(),
            privacy: Privacy::default(),
            is_anonymous: true,
            linked_account_type: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// The digital business card
///
/// Edits go through `with_*` methods that return a new value with one
/// field changed. The four contact lists never exceed
/// [`MAX_DYNAMIC_FIELDS`] entries.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessCard {
    id: Option<String>,
    user_id: Option<String>,
    name: String,
    photo_url: String,
    address: String,
    phones: DynamicFieldList,
    emails: DynamicFieldList,
    websites: DynamicFieldList,
    faxes: DynamicFieldList,
    template_id: u32,
    color_theme: ColorTheme,
    privacy: Privacy,
    is_anonymous: bool,
    linked_account_type: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Default for BusinessCard {
    fn default() -> Self {
        Self::new(CardOptions::default())
    }
}

impl BusinessCard {
    /// Build a card from options, normalizing the contact lists
    pub fn new(options: CardOptions) -> Self {
        let now = Utc::now();
        Self {
            id: options.id,
            user_id: options.user_id,
            name: options.name,
            photo_url: options.photo_url,
            address: options.address,
            phones: normalize_fields(options.phones),
            emails: normalize_fields(options.emails),
            websites: normalize_fields(options.websites),
            faxes: normalize_fields(options.faxes),
            template_id: options.template_id,
            color_theme: options.color_theme,
            privacy: options.privacy,
            is_anonymous: options.is_anonymous,
            linked_account_type: options.linked_account_type,
            created_at: options.created_at.unwrap_or(now),
            updated_at: options.updated_at.unwrap_or(now),
        }
    }

    /// Empty card owned by `user_id`, as shown when a user starts creating one
    pub fn draft(user_id: impl Into<String>) -> Self {
        Self::new(CardOptions {
            user_id: Some(user_id.into()),
            ..Default::default()
        })
    }

    /// Rebuild a card from a stored record and the key it was stored under
    pub fn from_stored(id: &str, record: CardRecord) -> Result<Self> {
        if id.trim().is_empty() {
            return Err(Error::NotFound("stored card has no identifier".to_string()));
        }

        let wrap = |fields: Vec<DynamicField>| fields.into_iter().map(FieldInput::Field).collect();

        Ok(Self::new(CardOptions {
            id: Some(id.to_string()),
            user_id: record.user_id,
            name: record.name,
            photo_url: record.photo_url,
            address: record.address,
            phones: wrap(record.phones),
            emails: wrap(record.emails),
            websites: wrap(record.websites),
            faxes: wrap(record.faxes),
            template_id: record.template_id,
            color_theme: record.color_theme,
            privacy: record.privacy,
            is_anonymous: record.is_anonymous,
            linked_account_type: record.linked_account_type,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }))
    }

    /// Produce the stored representation.
    ///
    /// The identifier is omitted because it is the record's key. `updatedAt`
    /// is stamped with the current time and always moves past the previous
    /// value; `createdAt` passes through unchanged.
    pub fn to_record(&self) -> CardRecord {
        let now = Utc::now();
        let updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at
                .checked_add_signed(Duration::microseconds(1))
                .unwrap_or(self.updated_at)
        };

        let plain = |list: &DynamicFieldList| list.iter().cloned().collect();

        CardRecord {
            user_id: self.user_id.clone(),
            name: self.name.clone(),
            photo_url: self.photo_url.clone(),
            address: self.address.clone(),
            phones: plain(&self.phones),
            emails: plain(&self.emails),
            websites: plain(&self.websites),
            faxes: plain(&self.faxes),
            template_id: self.template_id,
            color_theme: self.color_theme,
            privacy: self.privacy,
            is_anonymous: self.is_anonymous,
            linked_account_type: self.linked_account_type.clone(),
            created_at: Some(self.created_at),
            updated_at: Some(updated_at),
        }
    }

    /// A card can be saved once its trimmed name is non-empty
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::ValidationFailed("card name is required".to_string()))
        }
    }

    // ---- accessors ----

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn photo_url(&self) -> &str {
        &self.photo_url
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn phones(&self) -> &DynamicFieldList {
        &self.phones
    }

    pub fn emails(&self) -> &DynamicFieldList {
        &self.emails
    }

    pub fn websites(&self) -> &DynamicFieldList {
        &self.websites
    }

    pub fn faxes(&self) -> &DynamicFieldList {
        &self.faxes
    }

    pub fn fields(&self, kind: FieldKind) -> &DynamicFieldList {
        match kind {
            FieldKind::Phone => &self.phones,
            FieldKind::Email => &self.emails,
            FieldKind::Website => &self.websites,
            FieldKind::Fax => &self.faxes,
        }
    }

    fn fields_mut(&mut self, kind: FieldKind) -> &mut DynamicFieldList {
        match kind {
            FieldKind::Phone => &mut self.phones,
            FieldKind::Email => &mut self.emails,
            FieldKind::Website => &mut self.websites,
            FieldKind::Fax => &mut self.faxes,
        }
    }

    pub fn template_id(&self) -> u32 {
        self.template_id
    }

    pub fn color_theme(&self) -> ColorTheme {
        self.color_theme
    }

    pub fn privacy(&self) -> Privacy {
        self.privacy
    }

    pub fn is_anonymous(&self) -> bool {
        self.is_anonymous
    }

    pub fn linked_account_type(&self) -> Option<&str> {
        self.linked_account_type.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // ---- single-field updates ----

    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id;
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_photo_url(mut self, photo_url: impl Into<String>) -> Self {
        self.photo_url = photo_url.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_template_id(mut self, template_id: u32) -> Self {
        self.template_id = template_id;
        self
    }

    pub fn with_color_theme(mut self, color_theme: ColorTheme) -> Self {
        self.color_theme = color_theme;
        self
    }

    pub fn with_privacy(mut self, privacy: Privacy) -> Self {
        self.privacy = privacy;
        self
    }

    /// Set provenance from the owning account
    pub fn with_provenance(mut self, is_anonymous: bool, linked_account_type: Option<String>) -> Self {
        self.is_anonymous = is_anonymous;
        self.linked_account_type = linked_account_type;
        self
    }

    /// Copy with a field appended; unchanged when the list is already full
    pub fn with_field_added(mut self, kind: FieldKind, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_field(kind, label, value);
        self
    }

    /// Copy with one part of an existing field replaced
    pub fn with_field_updated(&self, kind: FieldKind, index: usize, part: FieldPart, new_value: impl Into<String>) -> Result<Self> {
        let mut card = self.clone();
        card.update_field(kind, index, part, new_value)?;
        Ok(card)
    }

    /// Copy with the field at `index` removed
    pub fn with_field_removed(&self, kind: FieldKind, index: usize) -> Result<Self> {
        let mut card = self.clone();
        card.remove_field(kind, index)?;
        Ok(card)
    }

    // ---- in-place list edits ----

    /// Append a field; returns `false` when the list already holds the maximum
    pub fn add_field(&mut self, kind: FieldKind, label: impl Into<String>, value: impl Into<String>) -> bool {
        self.fields_mut(kind).push(DynamicField::new(label, value))
    }

    pub fn update_field(&mut self, kind: FieldKind, index: usize, part: FieldPart, new_value: impl Into<String>) -> Result<()> {
        let new_value = new_value.into();
        self.fields_mut(kind).update(index, |field| match part {
            FieldPart::Label => field.label = new_value,
            FieldPart::Value => field.value = new_value,
        })
    }

    pub fn remove_field(&mut self, kind: FieldKind, index: usize) -> Result<DynamicField> {
        self.fields_mut(kind).remove(index)
    }

    pub fn add_phone(&mut self, label: impl Into<String>, value: impl Into<String>) -> bool {
        self.add_field(FieldKind::Phone, label, value)
    }

    pub fn add_email(&mut self, label: impl Into<String>, value: impl Into<String>) -> bool {
        self.add_field(FieldKind::Email, label, value)
    }

    pub fn add_website(&mut self, label: impl Into<String>, value: impl Into<String>) -> bool {
        self.add_field(FieldKind::Website, label, value)
    }

    pub fn add_fax(&mut self, label: impl Into<String>, value: impl Into<String>) -> bool {
        self.add_field(FieldKind::Fax, label, value)
    }

    pub fn remove_phone(&mut self, index: usize) -> Result<DynamicField> {
        self.remove_field(FieldKind::Phone, index)
    }

    pub fn remove_email(&mut self, index: usize) -> Result<DynamicField> {
        self.remove_field(FieldKind::Email, index)
    }

    pub fn remove_website(&mut self, index: usize) -> Result<DynamicField> {
        self.remove_field(FieldKind::Website, index)
    }

    pub fn remove_fax(&mut self, index: usize) -> Result<DynamicField> {
        self.remove_field(FieldKind::Fax, index)
    }

    /// Compact projection for list screens
    pub fn preview(&self) -> CardPreview {
        CardPreview {
            id: self.id.clone(),
            name: self.name.clone(),
            photo_url: Some(self.photo_url.clone()).filter(|url| !url.is_empty()),
            primary_phone: self.phones.first().map(|f| f.value.clone()),
            primary_email: self.emails.first().map(|f| f.value.clone()),
            template_id: self.template_id,
            privacy: self.privacy,
        }
    }
}

/// Compact card summary; the first entry of a list is its primary one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardPreview {
    pub id: Option<String>,
    pub name: String,
    pub photo_url: Option<String>,
    pub primary_phone: Option<String>,
    pub primary_email: Option<String>,
    pub template_id: u32,
    pub privacy: Privacy,
}

impl CardPreview {
    pub fn template_label(&self) -> String {
        format!("Template {}", self.template_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let card = BusinessCard::default();
        assert_eq!(card.id(), None);
        assert_eq!(card.name(), "");
        assert_eq!(card.template_id(), 1);
        assert_eq!(card.color_theme(), ColorTheme::Blue);
        assert_eq!(card.privacy(), Privacy::Public);
        assert!(card.is_anonymous());
        assert!(card.phones().is_empty());
        assert_eq!(card.phones().capacity(), Some(MAX_DYNAMIC_FIELDS));
    }

    #[test]
    fn test_is_valid() {
        for name in ["", "   "] {
            assert!(!BusinessCard::default().with_name(name).is_valid());
        }
        for name in ["A", "  A  "] {
            assert!(BusinessCard::default().with_name(name).is_valid());
        }
    }

    #[test]
    fn test_validate_error() {
        let err = BusinessCard::default().validate().unwrap_err();
        assert!(matches!(err, Error::ValidationFailed(_)));
    }

    #[test]
    fn test_add_phone_caps_at_three() {
        let mut card = BusinessCard::draft("u1").with_name("Jane Doe");
        assert!(card.add_phone("mobile", "555-0100"));
        assert!(card.add_phone("mobile", "555-0101"));
        assert!(card.add_phone("mobile", "555-0102"));
        assert!(!card.add_phone("mobile", "555-0103"));

        let values: Vec<_> = card.phones().iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, ["555-0100", "555-0101", "555-0102"]);
    }

    #[test]
    fn test_every_list_is_capped() {
        for kind in FieldKind::ALL {
            let mut card = BusinessCard::default();
            for i in 0..5 {
                card = card.with_field_added(kind, "label", format!("v{}", i));
            }
            assert_eq!(card.fields(kind).len(), 3, "{} list exceeded cap", kind);
        }
    }

    #[test]
    fn test_update_out_of_range_leaves_card_unchanged() {
        let card = BusinessCard::default().with_field_added(FieldKind::Email, "work", "a@b.co");
        let err = card
            .with_field_updated(FieldKind::Email, 1, FieldPart::Value, "x@y.co")
            .unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 1, len: 1 }));
        assert_eq!(card.emails().get(0).unwrap().value, "a@b.co");
    }

    #[test]
    fn test_update_label_and_value() {
        let card = BusinessCard::default()
            .with_field_added(FieldKind::Website, "blog", "example.com")
            .with_field_updated(FieldKind::Website, 0, FieldPart::Label, "home")
            .unwrap()
            .with_field_updated(FieldKind::Website, 0, FieldPart::Value, "example.org")
            .unwrap();
        assert_eq!(card.websites().first(), Some(&DynamicField::new("home", "example.org")));
    }

    #[test]
    fn test_remove_shifts_left() {
        let mut card = BusinessCard::default();
        card.add_fax("a", "1");
        card.add_fax("b", "2");
        card.add_fax("c", "3");

        let removed = card.remove_fax(0).unwrap();
        assert_eq!(removed.label, "a");
        let labels: Vec<_> = card.faxes().iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, ["b", "c"]);

        assert!(card.remove_fax(2).is_err());
        assert_eq!(card.faxes().len(), 2);
    }

    #[test]
    fn test_normalization_is_idempotent_and_ordered() {
        let options = CardOptions {
            phones: vec![
                DynamicField::new("work", "1").into(),
                json!({"label": "home", "value": "2"}).into(),
                json!({"value": 3}).into(),
                ("extra", "4").into(),
            ],
            ..Default::default()
        };
        let card = BusinessCard::new(options);

        assert_eq!(
            card.phones().as_slice(),
            &[
                DynamicField::new("work", "1"),
                DynamicField::new("home", "2"),
                DynamicField::new("", "3"),
            ]
        );

        let again = BusinessCard::new(CardOptions {
            phones: card.phones().iter().cloned().map(FieldInput::from).collect(),
            ..Default::default()
        });
        assert_eq!(again.phones(), card.phones());
    }

    #[test]
    fn test_explicit_timestamps_kept() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let card = BusinessCard::new(CardOptions {
            created_at: Some(t0),
            updated_at: Some(t0),
            ..Default::default()
        });
        assert_eq!(card.created_at(), t0);
        assert_eq!(card.updated_at(), t0);
    }

    #[test]
    fn test_to_record_omits_id_and_advances_updated_at() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let card = BusinessCard::new(CardOptions {
            id: Some("c1".into()),
            name: "Acme".into(),
            created_at: Some(t0),
            updated_at: Some(t0),
            ..Default::default()
        });

        let record = card.to_record();
        assert_eq!(record.created_at, Some(t0));
        assert!(record.updated_at.unwrap() > t0);

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["name"], "Acme");
    }

    #[test]
    fn test_updated_at_advances_even_from_future() {
        let future = Utc::now() + Duration::hours(1);
        let card = BusinessCard::new(CardOptions {
            updated_at: Some(future),
            ..Default::default()
        });
        assert!(card.to_record().updated_at.unwrap() > future);
    }

    #[test]
    fn test_updated_at_at_chrono_max_does_not_overflow() {
        let card = BusinessCard::new(CardOptions {
            name: "Acme".into(),
            updated_at: Some(DateTime::<Utc>::MAX_UTC),
            ..Default::default()
        });
        assert_eq!(card.to_record().updated_at, Some(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let t0 = Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap();
        let card = BusinessCard::new(CardOptions {
            id: Some("c9".into()),
            user_id: Some("u1".into()),
            name: "Jane Doe".into(),
            photo_url: "https://img.example.com/j.png".into(),
            address: "1 Main St".into(),
            phones: vec![("mobile", "555-0100").into(), ("office", "555-0199").into()],
            emails: vec![("work", "jane@example.com").into()],
            websites: vec![("blog", "jane.dev").into()],
            faxes: vec![("office", "555-0150").into()],
            template_id: 7,
            color_theme: ColorTheme::Pink,
            privacy: Privacy::LinkOnly,
            is_anonymous: false,
            linked_account_type: Some("google".into()),
            created_at: Some(t0),
            updated_at: Some(t0),
        });

        let json = serde_json::to_string(&card.to_record()).unwrap();
        let record: CardRecord = serde_json::from_str(&json).unwrap();
        let back = BusinessCard::from_stored("c9", record).unwrap();

        assert_eq!(back.created_at(), t0);
        assert!(back.updated_at() > t0);
        let updated_at = back.updated_at();
        assert_eq!(back, card.with_updated_for_test(updated_at));
    }

    #[test]
    fn test_from_stored_requires_id() {
        let err = BusinessCard::from_stored("", CardRecord::default()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_preview_uses_primary_entries() {
        let card = BusinessCard::default()
            .with_name("Acme")
            .with_field_added(FieldKind::Phone, "work", "555")
            .with_field_added(FieldKind::Phone, "home", "777")
            .with_template_id(4);
        let preview = card.preview();
        assert_eq!(preview.primary_phone.as_deref(), Some("555"));
        assert_eq!(preview.primary_email, None);
        assert_eq!(preview.photo_url, None);
        assert_eq!(preview.template_label(), "Template 4");
    }

    #[test]
    fn test_privacy_parse() {
        assert_eq!("link_only".parse::<Privacy>().unwrap(), Privacy::LinkOnly);
        assert_eq!(serde_json::to_string(&Privacy::LinkOnly).unwrap(), "\"link_only\"");
        assert!("secret".parse::<Privacy>().is_err());
    }

    impl BusinessCard {
        fn with_updated_for_test(mut self, updated_at: DateTime<Utc>) -> Self {
            self.updated_at = updated_at;
            self
        }
    }
}
