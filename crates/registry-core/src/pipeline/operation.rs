use crate::entity::EntityKind;
use crate::notification::OperationType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Modify,
    Remove,
    Lookup,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Create,
        Operation::Modify,
        Operation::Remove,
        Operation::Lookup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Modify => "modify",
            Self::Remove => "remove",
            Self::Lookup => "lookup",
        }
    }

    /// Change notification emitted after a successful request, if any
    pub fn notification_type(&self) -> Option<OperationType> {
        match self {
            Self::Create => Some(OperationType::Creation),
            Self::Modify => Some(OperationType::Modification),
            Self::Remove => Some(OperationType::Removal),
            Self::Lookup => None,
        }
    }

    /// Platform writes and every resource write need the platform owner's token
    pub fn requires_authorization(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Platform => matches!(self, Self::Modify | Self::Remove),
            EntityKind::Resource => matches!(self, Self::Create | Self::Modify | Self::Remove),
            _ => false,
        }
    }

    /// Request queue name: `<prefix>.<entity>.<operation>`
    pub fn queue_name(&self, prefix: &str, kind: EntityKind) -> String {
        format!("{}.{}.{}", prefix, kind.as_str(), self.as_str())
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_table() {
        assert!(!Operation::Create.requires_authorization(EntityKind::Platform));
        assert!(Operation::Modify.requires_authorization(EntityKind::Platform));
        assert!(Operation::Remove.requires_authorization(EntityKind::Platform));
        assert!(Operation::Create.requires_authorization(EntityKind::Resource));
        assert!(!Operation::Lookup.requires_authorization(EntityKind::Resource));
        for op in Operation::ALL {
            assert!(!op.requires_authorization(EntityKind::Device));
            assert!(!op.requires_authorization(EntityKind::SmartSpace));
            assert!(!op.requires_authorization(EntityKind::InformationModel));
        }
    }

    #[test]
    fn test_queue_name() {
        assert_eq!(
            Operation::Lookup.queue_name("registry", EntityKind::InformationModel),
            "registry.information_model.lookup"
        );
    }

    #[test]
    fn test_lookup_never_notifies() {
        assert_eq!(Operation::Lookup.notification_type(), None);
        assert_eq!(Operation::Remove.notification_type(), Some(OperationType::Removal));
    }
}
