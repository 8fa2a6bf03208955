use knobs_core::{Panel, PanelConfig, SharedTarget, Target};

use crate::errors::MarkupResult;
use crate::markup::parse_panels;

/// Targets a markup document can refer to by selector. A panel whose
/// selector matches nothing gets the first registered target. Any number
/// of panels may bind to the same target.
pub struct TargetRegistry<T> {
    targets: Vec<(String, SharedTarget<T>)>,
}

impl<T> Default for TargetRegistry<T> {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
        }
    }
}

impl<T: Target> TargetRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `target` under `selector` and return a handle to it.
    pub fn register(&mut self, selector: impl Into<String>, target: T) -> SharedTarget<T> {
        let handle = SharedTarget::new(target);
        self.targets.push((selector.into(), handle.clone()));
        handle
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn resolve(&self, selector: Option<&str>) -> Option<SharedTarget<T>> {
        let (_, first) = self.targets.first()?;
        let matched = selector.and_then(|s| {
            self.targets
                .iter()
                .find(|(key, _)| key == s)
                .map(|(_, target)| target)
        });
        if let (None, Some(s)) = (matched, selector) {
            log::debug!("no target registered as '{}', using the first one", s);
        }
        Some(matched.unwrap_or(first).clone())
    }

    /// Bind `config` to its target. Fails with `PanelError::NoTarget` when
    /// the registry is empty.
    pub fn build_panel(&self, config: &PanelConfig) -> MarkupResult<Panel<SharedTarget<T>>> {
        let target = self.resolve(config.target.as_deref());
        Ok(Panel::new(target, config)?)
    }

    /// Parse `source` and build one panel per `<highcharts-controls>` element.
    pub fn build_panels(&self, source: &str) -> MarkupResult<Vec<Panel<SharedTarget<T>>>> {
        parse_panels(source)?
            .iter()
            .map(|config| self.build_panel(config))
            .collect()
    }
}
