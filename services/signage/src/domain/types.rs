use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use counterate_domain::identity::{Role, Status};
use counterate_domain::snapshot::{DepositEntry, DisplayConfig, RateEntry, VideoPlaylist};

/// Credential hash that no verifier accepts. Identities fabricated by repair
/// carry it until an operator resets their credential.
pub const LOCKED_CREDENTIAL: &str = "!";

pub const USERNAME_MAX_LEN: usize = 32;

/// Authenticatable principal (super-admin, unit admin or display terminal).
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub credential_hash: String,
    pub role: Role,
    pub status: Status,
    pub session_version: i32,
    pub paired_user_id: Option<Uuid>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(username: String, credential_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            username,
            credential_hash,
            role,
            status: Status::Active,
            session_version: 0,
            paired_user_id: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// An identity loaded together with both possible pairing edges.
#[derive(Debug, Clone)]
pub struct PairingView {
    pub identity: Identity,
    /// The identity this one holds a pointer to.
    pub points_to: Option<Identity>,
    /// The identity holding a pointer to this one.
    pub pointed_from: Option<Identity>,
}

impl PairingView {
    /// The other side of the unit, whichever direction the pointer runs.
    pub fn counterpart(&self) -> Option<&Identity> {
        self.points_to.as_ref().or(self.pointed_from.as_ref())
    }
}

/// What the resolver may do when a display has no resolvable admin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepairPolicy {
    /// Never write; orphans resolve to nothing.
    Off,
    /// Pair with an existing unpaired admin if one exists.
    Adopt,
    /// Adopt, else fabricate a locked admin for the display.
    #[default]
    AdoptOrCreate,
}

impl RepairPolicy {
    pub fn may_adopt(self) -> bool {
        !matches!(self, Self::Off)
    }

    pub fn may_create(self) -> bool {
        matches!(self, Self::AdoptOrCreate)
    }
}

/// Defaults applied to identities and configs the service creates itself.
#[derive(Debug, Clone)]
pub struct UnitDefaults {
    pub admin_credential_hash: String,
    pub display_credential_hash: String,
    pub marquee_text: String,
}

impl UnitDefaults {
    pub fn credential_for(&self, role: Role) -> &str {
        match role {
            Role::Display => &self.display_credential_hash,
            Role::Admin | Role::SuperAdmin => &self.admin_credential_hash,
        }
    }
}

impl Default for UnitDefaults {
    fn default() -> Self {
        Self {
            admin_credential_hash: LOCKED_CREDENTIAL.to_owned(),
            display_credential_hash: LOCKED_CREDENTIAL.to_owned(),
            marquee_text: "Welcome to Our Branch".to_owned(),
        }
    }
}

/// Per-unit branding plus the single-slot command mailbox.
#[derive(Debug, Clone)]
pub struct UnitConfig {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub refresh_interval: i32,
    pub marquee_text: String,
    pub theme: String,
    pub left_logo_url: Option<String>,
    pub right_logo_url: Option<String>,
    pub left_title: Option<String>,
    pub right_title: Option<String>,
    pub show_clock: bool,
    pub pending_command: Option<String>,
    pub command_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UnitConfig {
    pub const DEFAULT_REFRESH_INTERVAL: i32 = 30;
    pub const DEFAULT_THEME: &'static str = "banking-blue";

    pub fn new(admin_id: Uuid, marquee_text: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            admin_id,
            refresh_interval: Self::DEFAULT_REFRESH_INTERVAL,
            marquee_text,
            theme: Self::DEFAULT_THEME.to_owned(),
            left_logo_url: None,
            right_logo_url: None,
            left_title: None,
            right_title: None,
            show_clock: true,
            pending_command: None,
            command_updated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Branding as terminals see it. Mailbox fields stay server-side.
    pub fn display_config(&self) -> DisplayConfig {
        DisplayConfig {
            refresh_interval: self.refresh_interval,
            marquee_text: self.marquee_text.clone(),
            theme: self.theme.clone(),
            left_logo_url: self.left_logo_url.clone(),
            right_logo_url: self.right_logo_url.clone(),
            left_title: self.left_title.clone(),
            right_title: self.right_title.clone(),
            show_clock: self.show_clock,
        }
    }
}

/// Partial branding update. `None` leaves a field unchanged; an empty string
/// clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct BrandingPatch {
    pub marquee_text: Option<String>,
    pub theme: Option<String>,
    pub refresh_interval: Option<i32>,
    pub left_title: Option<String>,
    pub right_title: Option<String>,
    pub left_logo_url: Option<String>,
    pub right_logo_url: Option<String>,
    pub show_clock: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct ForexRate {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub currency: String,
    pub currency_name: String,
    pub tt_buy: f64,
    pub tt_sell: f64,
    pub bank_buy: f64,
    pub bank_sell: f64,
    pub order: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ForexRate {
    pub fn entry(&self) -> RateEntry {
        RateEntry {
            id: self.id,
            currency: self.currency.clone(),
            currency_name: self.currency_name.clone(),
            tt_buy: self.tt_buy,
            tt_sell: self.tt_sell,
            bank_buy: self.bank_buy,
            bank_sell: self.bank_sell,
            order: self.order,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DepositRate {
    pub id: Uuid,
    pub admin_id: Uuid,
    /// Months.
    pub tenor: i32,
    pub rate: f64,
    pub order: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DepositRate {
    pub fn entry(&self) -> DepositEntry {
        DepositEntry {
            id: self.id,
            tenor: self.tenor,
            rate: self.rate,
            order: self.order,
        }
    }
}

/// Video playlist with sources already in play order.
#[derive(Debug, Clone)]
pub struct VideoDisplay {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub active: bool,
    pub sources: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl VideoDisplay {
    pub fn playlist(&self) -> VideoPlaylist {
        VideoPlaylist {
            active: self.active,
            sources: self.sources.clone(),
        }
    }
}

/// Field changes for one identity. `None` leaves a field unchanged.
#[derive(Debug, Clone)]
pub struct IdentityPatch {
    pub id: Uuid,
    pub username: Option<String>,
    pub credential_hash: Option<String>,
    pub status: Option<Status>,
}

impl IdentityPatch {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            username: None,
            credential_hash: None,
            status: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.credential_hash.is_none() && self.status.is_none()
    }
}

/// Everything written when a super-admin creates a unit.
#[derive(Debug, Clone)]
pub struct NewUnit {
    pub admin: Identity,
    pub display: Identity,
    pub config: UnitConfig,
}

/// One row of the super-admin unit listing.
#[derive(Debug, Clone)]
pub struct UnitSummary {
    pub admin: Identity,
    pub display: Option<Identity>,
    pub marquee_text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub details: String,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An audit entry with its actor as currently stored. The actor may since
/// have been deleted.
#[derive(Debug, Clone)]
pub struct ActivityRecord {
    pub entry: ActivityEntry,
    pub username: Option<String>,
    pub role: Option<Role>,
}

/// Usernames are 1-32 characters of ASCII alphanumerics, `-`, `_` or `.`.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= USERNAME_MAX_LEN
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

pub fn default_display_username(admin_username: &str) -> String {
    format!("display_{admin_username}")
}
