//! Bound settings controls, as data.
//!
//! # Design
//! - Every synchronized control is listed here once; the browser glue only resolves elements.
//! - Id-addressed controls use [`ControlSpec`]; repeated per-row controls use [`ClassGroupSpec`].
//! - Guild controls are templated on the guild id (`guild-{id}-{suffix}`).

use crate::core::binding::{BindingOptions, ControlKind, Feedback, FieldBinding, SuccessEffect};
use crate::core::error::BindingError;
use crate::core::transport::Endpoint;

/// Control addressed by element id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlSpec {
    /// Element id, or the id suffix for guild templates.
    pub id: &'static str,
    /// Control family.
    pub kind: ControlKind,
    /// Field path in the request body.
    pub path: &'static str,
    /// Keep stored secrets when the box is cleared.
    pub skip_empty: bool,
    /// Success means a server restart is needed.
    pub restart_required: bool,
}

impl ControlSpec {
    const fn new(id: &'static str, kind: ControlKind, path: &'static str) -> Self {
        Self {
            id,
            kind,
            path,
            skip_empty: false,
            restart_required: false,
        }
    }

    const fn secret(self) -> Self {
        Self {
            skip_empty: true,
            ..self
        }
    }

    const fn needs_restart(self) -> Self {
        Self {
            restart_required: true,
            ..self
        }
    }

    /// Bind this spec to `control` writing to `endpoint`.
    ///
    /// # Errors
    /// Returns a [`BindingError`] when the path is malformed.
    pub fn bind(
        &self,
        control: impl Into<String>,
        endpoint: Endpoint,
    ) -> Result<FieldBinding, BindingError> {
        Ok(
            FieldBinding::new(control, self.kind, endpoint, self.path)?.with_options(
                BindingOptions {
                    skip_empty: self.skip_empty,
                    debounce_ms: None,
                    feedback: Feedback::Indicator,
                    effect: self.restart_required.then_some(SuccessEffect::RestartRequired),
                },
            ),
        )
    }
}

/// Endpoint family a class group writes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// `/settings/guild/{id}`.
    Guild,
    /// `/settings/channel/{id}`.
    Channel,
    /// `/settings/user/{id}`.
    Member,
}

impl Scope {
    /// Endpoint for `id`.
    ///
    /// # Errors
    /// Returns [`BindingError::MissingScopeId`] when `id` is blank.
    pub fn endpoint(self, id: &str) -> Result<Endpoint, BindingError> {
        match self {
            Self::Guild => Endpoint::scoped(Endpoint::Guild, "guild", id),
            Self::Channel => Endpoint::scoped(Endpoint::Channel, "channel", id),
            Self::Member => Endpoint::scoped(Endpoint::Member, "member", id),
        }
    }

    /// `data-*` attribute (camel-cased dataset key) holding the id.
    #[must_use]
    pub const fn id_attribute(self) -> &'static str {
        match self {
            Self::Guild => "data-guild-id",
            Self::Channel => "data-channel-id",
            Self::Member => "data-user-id",
        }
    }
}

/// Controls sharing a CSS class, one per row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassGroupSpec {
    /// CSS class (without the dot).
    pub class: &'static str,
    /// Control family.
    pub kind: ControlKind,
    /// Endpoint family; the id comes from [`Scope::id_attribute`].
    pub scope: Scope,
    /// Field path in the request body.
    pub path: &'static str,
    /// Reporting mode.
    pub feedback: Feedback,
}

impl ClassGroupSpec {
    /// Bind one member of the group.
    ///
    /// # Errors
    /// Returns a [`BindingError`] for a blank scope id or malformed path.
    pub fn bind(&self, scope_id: &str) -> Result<FieldBinding, BindingError> {
        let control = format!("{}-{}", self.class, scope_id.trim());
        Ok(
            FieldBinding::new(control, self.kind, self.scope.endpoint(scope_id)?, self.path)?
                .with_options(BindingOptions {
                    feedback: self.feedback,
                    ..BindingOptions::default()
                }),
        )
    }
}

/// Selector for guild containers.
pub const GUILD_CONTAINER_SELECTOR: &str = ".collapse[data-guild-id]";

/// Current user's preferences (`/settings/user`).
pub const USER_CONTROLS: &[ControlSpec] = &[
    ControlSpec::new("backup-opt-out", ControlKind::Toggle, "backupOptOut"),
    ControlSpec::new("ai-chat-opt-out", ControlKind::Toggle, "aiChatOptOut"),
    ControlSpec::new("auto-expand-reddit", ControlKind::Toggle, "autoExpand.reddit"),
    ControlSpec::new(
        "auto-expand-youtube-shorts",
        ControlKind::Toggle,
        "autoExpand.youTubeShorts",
    ),
    ControlSpec::new("auto-expand-redgifs", ControlKind::Toggle, "autoExpand.redGifs"),
];

/// Server-wide settings (`/settings/admin`).
pub const ADMIN_CONTROLS: &[ControlSpec] = &[
    ControlSpec::new("admin-log-level", ControlKind::Select, "logLevel").needs_restart(),
    ControlSpec::new("admin-host", ControlKind::Text, "host").needs_restart(),
    ControlSpec::new("admin-port", ControlKind::Number, "port").needs_restart(),
    ControlSpec::new("admin-proxy-port", ControlKind::Number, "proxyPort").needs_restart(),
    ControlSpec::new("admin-bot-token", ControlKind::Text, "botToken")
        .secret()
        .needs_restart(),
    ControlSpec::new("admin-ollama-url", ControlKind::Text, "ollamaURL").needs_restart(),
    ControlSpec::new("admin-system-prompt", ControlKind::Text, "systemPrompt").needs_restart(),
    ControlSpec::new(
        "admin-disable-autoexpand-reddit",
        ControlKind::Toggle,
        "disableAutoExpand.reddit",
    ),
    ControlSpec::new(
        "admin-disable-autoexpand-youtube-shorts",
        ControlKind::Toggle,
        "disableAutoExpand.youTubeShorts",
    ),
    ControlSpec::new(
        "admin-disable-autoexpand-redgifs",
        ControlKind::Toggle,
        "disableAutoExpand.redGifs",
    ),
];

/// Per-guild controls; `id` is the suffix after `guild-{guildId}-`.
pub const GUILD_CONTROLS: &[ControlSpec] = &[
    ControlSpec::new("backup-password", ControlKind::Text, "backupPassword").secret(),
    ControlSpec::new("synctube", ControlKind::Text, "synctubeURL"),
    ControlSpec::new("system-prompt", ControlKind::Text, "systemPrompt"),
    ControlSpec::new("backup", ControlKind::Toggle, "backupEnabled"),
    ControlSpec::new("antirot", ControlKind::Toggle, "antiRotEnabled"),
    ControlSpec::new("aichat", ControlKind::Toggle, "aiChatEnabled"),
];

/// Repeated per-row controls.
pub const CLASS_GROUPS: &[ClassGroupSpec] = &[
    ClassGroupSpec {
        class: "channel-backup",
        kind: ControlKind::Checkbox,
        scope: Scope::Channel,
        path: "backupEnabled",
        feedback: Feedback::Indicator,
    },
    ClassGroupSpec {
        class: "channel-aichat",
        kind: ControlKind::Checkbox,
        scope: Scope::Channel,
        path: "aiChat",
        feedback: Feedback::Indicator,
    },
    ClassGroupSpec {
        class: "guild-fav-channel",
        kind: ControlKind::Radio,
        scope: Scope::Guild,
        path: "favChannelID",
        feedback: Feedback::Silent,
    },
    ClassGroupSpec {
        class: "guild-bot-channel",
        kind: ControlKind::Radio,
        scope: Scope::Guild,
        path: "botChannelID",
        feedback: Feedback::Silent,
    },
    ClassGroupSpec {
        class: "user-admin",
        kind: ControlKind::Checkbox,
        scope: Scope::Member,
        path: "isAdmin",
        feedback: Feedback::Indicator,
    },
    ClassGroupSpec {
        class: "user-backup",
        kind: ControlKind::Checkbox,
        scope: Scope::Member,
        path: "backupAccess",
        feedback: Feedback::Indicator,
    },
    ClassGroupSpec {
        class: "user-ai",
        kind: ControlKind::Checkbox,
        scope: Scope::Member,
        path: "aiAccess",
        feedback: Feedback::Indicator,
    },
];

/// Element id of a templated guild control.
#[must_use]
pub fn guild_control_id(guild_id: &str, suffix: &str) -> String {
    format!("guild-{guild_id}-{suffix}")
}

/// Bind all user and admin controls.
///
/// # Errors
/// Returns the first [`BindingError`] found.
pub fn page_bindings() -> Result<Vec<FieldBinding>, BindingError> {
    let user = USER_CONTROLS
        .iter()
        .map(|spec| spec.bind(spec.id, Endpoint::User));
    let admin = ADMIN_CONTROLS
        .iter()
        .map(|spec| spec.bind(spec.id, Endpoint::Admin));
    user.chain(admin).collect()
}

/// Bind the templated controls of one guild.
///
/// # Errors
/// Returns a [`BindingError`] for a blank guild id.
pub fn guild_bindings(guild_id: &str) -> Result<Vec<FieldBinding>, BindingError> {
    let endpoint = Scope::Guild.endpoint(guild_id)?;
    GUILD_CONTROLS
        .iter()
        .map(|spec| spec.bind(guild_control_id(guild_id.trim(), spec.id), endpoint.clone()))
        .collect()
}
