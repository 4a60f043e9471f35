//! Session controller - per-view follow lifecycle and the runtime toggle

use std::collections::HashMap;
use std::fmt;

use super::engine::{Phase, SyncEngine, SyncOutcome};
use super::error::FollowError;
use super::highlight::HighlightManager;
use super::registry::{ResolverRef, ResolverRegistry};
use crate::config::{FollowConfig, MissingResolver, ToggleScope};
use crate::host::{Action, Host, Notice, ViewId, ViewKind};
use crate::keymap::{parse_key_string, Keystroke, KeyCode, Modifiers};

/// Per-output-view follow state
#[derive(Clone)]
pub struct Session {
    view: ViewId,
    kind: Option<ViewKind>,
    resolver_override: Option<ResolverRef>,
    height: Option<usize>,
    /// Only consulted when the toggle is scoped per session
    enabled: bool,
    phase: Phase,
    unconfigured_reported: bool,
}

impl Session {
    pub fn new(view: ViewId, kind: Option<ViewKind>) -> Self {
        Self {
            view,
            kind,
            resolver_override: None,
            height: None,
            enabled: true,
            phase: Phase::Idle,
            unconfigured_reported: false,
        }
    }

    /// Use `resolver` for this session regardless of the registry
    pub fn with_override(mut self, resolver: ResolverRef) -> Self {
        self.resolver_override = Some(resolver);
        self
    }

    pub fn with_height(mut self, height: Option<usize>) -> Self {
        self.height = height;
        self
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn kind(&self) -> Option<&ViewKind> {
        self.kind.as_ref()
    }

    pub fn resolver_override(&self) -> Option<&ResolverRef> {
        self.resolver_override.as_ref()
    }

    pub fn height(&self) -> Option<usize> {
        self.height
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// True the first time a missing resolver is reported for this session
    pub(crate) fn report_unconfigured_once(&mut self) -> bool {
        !std::mem::replace(&mut self.unconfigured_reported, true)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("view", &self.view)
            .field("kind", &self.kind)
            .field("has_override", &self.resolver_override.is_some())
            .field("height", &self.height)
            .field("enabled", &self.enabled)
            .field("phase", &self.phase)
            .finish()
    }
}

/// How a session finds its resolver
#[derive(Clone)]
pub enum ResolverChoice {
    /// Use the registry entry for the kind the host reports for the view
    ViewKind,
    /// Use the registry entry for this kind
    Kind(ViewKind),
    /// Use this resolver, ignoring the registry
    Override(ResolverRef),
}

/// Per-session options passed to [`FollowController::enable`]
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Visible height of the output view after each match; falls back to the
    /// configured per-kind height
    pub height: Option<usize>,
}

/// Owns every session, the resolver registry and the shared marks
#[derive(Debug)]
pub struct FollowController {
    registry: ResolverRegistry,
    engine: SyncEngine,
    sessions: HashMap<ViewId, Session>,
    /// Process-wide flag used with [`ToggleScope::Global`]
    enabled: bool,
    config: FollowConfig,
    toggle_key: Keystroke,
}

impl FollowController {
    pub fn new(config: FollowConfig, registry: ResolverRegistry) -> Self {
        let toggle_key = match parse_key_string(&config.toggle_key) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(
                    "Invalid toggle key '{}': {}, using 'f'",
                    config.toggle_key,
                    e
                );
                Keystroke::new(KeyCode::Char('f'), Modifiers::NONE)
            }
        };
        Self {
            registry,
            engine: SyncEngine::new(),
            sessions: HashMap::new(),
            enabled: config.enabled,
            config,
            toggle_key,
        }
    }

    pub fn registry(&self) -> &ResolverRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ResolverRegistry {
        &mut self.registry
    }

    /// Shorthand for `registry_mut().register(..)`
    pub fn register(&mut self, kind: impl Into<ViewKind>, resolver: ResolverRef) {
        self.registry.register(kind, resolver);
    }

    pub fn highlights(&self) -> &HighlightManager {
        self.engine.highlights()
    }

    pub fn config(&self) -> &FollowConfig {
        &self.config
    }

    pub fn toggle_key(&self) -> Keystroke {
        self.toggle_key
    }

    pub fn session(&self, view: ViewId) -> Option<&Session> {
        self.sessions.get(&view)
    }

    pub fn has_session(&self, view: ViewId) -> bool {
        self.sessions.contains_key(&view)
    }

    /// Whether commands in `view` currently resolve and mark
    pub fn is_enabled(&self, view: ViewId) -> bool {
        match self.config.toggle_scope {
            ToggleScope::Global => self.enabled,
            ToggleScope::Session => self.sessions.get(&view).is_some_and(|s| s.enabled),
        }
    }

    /// Start following `view`, replacing any existing session for it
    ///
    /// With [`MissingResolver::Notice`] a view without a resolver gets a
    /// warning and stays inactive; with [`MissingResolver::Fatal`] the error
    /// is also returned.
    pub fn enable(
        &mut self,
        host: &mut dyn Host,
        view: ViewId,
        choice: ResolverChoice,
        options: SessionOptions,
    ) -> Result<(), FollowError> {
        if host.cursor(view).is_none() {
            return Err(FollowError::UnknownView(view));
        }

        let kind = match &choice {
            ResolverChoice::Kind(kind) => Some(kind.clone()),
            ResolverChoice::ViewKind | ResolverChoice::Override(_) => host.view_kind(view),
        };
        let height = options
            .height
            .or_else(|| kind.as_ref().and_then(|k| self.config.height_for(k)));

        let mut session = Session::new(view, kind.clone()).with_height(height);
        if let ResolverChoice::Override(resolver) = choice {
            session = session.with_override(resolver);
        }
        if let Some(previous) = self.sessions.get(&view) {
            session.enabled = previous.enabled;
        } else {
            session.enabled = self.config.enabled;
        }

        if self.registry.resolver_for(&session).is_none() {
            // a failed re-enable leaves the view unfollowed
            self.disable(host, view);
            let err = FollowError::NoResolver { view, kind };
            return match self.config.missing_resolver {
                MissingResolver::Fatal => {
                    tracing::error!("{}", err);
                    host.notify(Notice::error(err.to_string()));
                    Err(err)
                }
                MissingResolver::Notice => {
                    tracing::warn!("{}", err);
                    host.notify(Notice::warning(err.to_string()));
                    Ok(())
                }
            };
        }

        if self.sessions.insert(view, session).is_none() {
            host.add_command_hooks(view);
            host.bind_action(view, self.toggle_key, Action::ToggleFollow);
            tracing::info!(%view, "Follow enabled");
        } else {
            tracing::info!(%view, "Follow session replaced");
        }
        Ok(())
    }

    /// Stop following `view`; clears the marks if this view placed them
    pub fn disable(&mut self, host: &mut dyn Host, view: ViewId) -> bool {
        if self.sessions.remove(&view).is_none() {
            return false;
        }
        host.remove_command_hooks(view);
        host.unbind_action(view, self.toggle_key);

        let highlights = self.engine.highlights_mut();
        if highlights.owner() == Some(view) {
            highlights.unmark_all(host);
        }
        tracing::info!(%view, "Follow disabled");
        true
    }

    /// Automatic hook for newly opened views: follow them if their kind is registered
    pub fn view_opened(&mut self, host: &mut dyn Host, view: ViewId) -> bool {
        let Some(kind) = host.view_kind(view) else {
            return false;
        };
        if !self.registry.contains(&kind) {
            return false;
        }
        tracing::debug!(%view, %kind, "Auto-enabling follow");
        self.enable(
            host,
            view,
            ResolverChoice::Kind(kind),
            SessionOptions::default(),
        )
        .is_ok()
            && self.has_session(view)
    }

    /// Must be called for every view the host closes, followed or not
    ///
    /// Tears down the view's session and detaches any mark drawn in it.
    pub fn view_closed(&mut self, host: &mut dyn Host, view: ViewId) {
        self.disable(host, view);
        if self.engine.highlights_mut().unmark_view(host, view) {
            tracing::debug!(%view, "Detached marks from closed view");
        }
    }

    /// Flip the enabled flag; global or per session depending on configuration
    ///
    /// Returns the new state.
    pub fn toggle(&mut self, host: &mut dyn Host, view: ViewId) -> bool {
        let enabled = match self.config.toggle_scope {
            ToggleScope::Global => {
                self.enabled = !self.enabled;
                self.enabled
            }
            ToggleScope::Session => match self.sessions.get_mut(&view) {
                Some(session) => {
                    session.enabled = !session.enabled;
                    session.enabled
                }
                None => return false,
            },
        };
        tracing::info!(%view, enabled, "Follow toggled");
        host.notify(Notice::info(if enabled {
            "Follow mode on"
        } else {
            "Follow mode off"
        }));
        enabled
    }

    pub fn handle_action(&mut self, host: &mut dyn Host, view: ViewId, action: Action) {
        match action {
            Action::ToggleFollow => {
                self.toggle(host, view);
            }
        }
    }

    /// Pre-command callback for `view`
    pub fn pre_command(&mut self, host: &mut dyn Host, view: ViewId) {
        let enabled = self.is_enabled(view);
        let Some(session) = self.sessions.get_mut(&view) else {
            return;
        };
        self.engine.pre_command(host, session, enabled);
    }

    /// Post-command callback for `view`
    pub fn post_command(&mut self, host: &mut dyn Host, view: ViewId) -> SyncOutcome {
        let enabled = self.is_enabled(view);
        let Some(session) = self.sessions.get_mut(&view) else {
            return SyncOutcome::Rejected;
        };
        let resolver = self.registry.resolver_for(session);
        self.engine
            .post_command(host, session, resolver.as_deref(), enabled)
    }
}
