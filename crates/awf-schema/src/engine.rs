//! Engine capability registry.

/// Which AI engines exist and what they support.
///
/// Consulted by the engine rule pass and when building hints for `engine`
/// violations.
pub trait EngineRegistry {
    /// Identifiers accepted in `engine:` / `engine.id`, in display order.
    fn engine_ids(&self) -> Vec<String>;

    /// Whether the engine accepts an `engine.permissions` block.
    fn supports_permissions(&self, id: &str) -> bool;

    fn is_known(&self, id: &str) -> bool {
        self.engine_ids().iter().any(|known| known == id)
    }
}

/// A built-in engine entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineInfo {
    pub id: &'static str,
    pub display_name: &'static str,
    pub supports_permissions: bool,
}

const BUILTIN_ENGINES: &[EngineInfo] = &[
    EngineInfo {
        id: "claude",
        display_name: "Claude Code",
        supports_permissions: true,
    },
    EngineInfo {
        id: "codex",
        display_name: "Codex",
        supports_permissions: false,
    },
    EngineInfo {
        id: "custom",
        display_name: "Custom Steps",
        supports_permissions: false,
    },
];

/// The registry of built-in engines.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEngineRegistry;

impl DefaultEngineRegistry {
    pub fn engines(&self) -> &'static [EngineInfo] {
        BUILTIN_ENGINES
    }

    pub fn get(&self, id: &str) -> Option<&'static EngineInfo> {
        BUILTIN_ENGINES.iter().find(|engine| engine.id == id)
    }
}

impl EngineRegistry for DefaultEngineRegistry {
    fn engine_ids(&self) -> Vec<String> {
        BUILTIN_ENGINES.iter().map(|engine| engine.id.to_string()).collect()
    }

    fn supports_permissions(&self, id: &str) -> bool {
        self.get(id).is_some_and(|engine| engine.supports_permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = DefaultEngineRegistry;
        assert_eq!(registry.engine_ids(), vec!["claude", "codex", "custom"]);
        assert!(registry.supports_permissions("claude"));
        assert!(!registry.supports_permissions("codex"));
        assert!(!registry.supports_permissions("unknown"));
        assert!(registry.is_known("custom"));
        assert!(!registry.is_known("gpt"));
    }
}
