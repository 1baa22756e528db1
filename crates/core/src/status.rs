//! Status enums backed by SMALLINT lookup tables.
//!
//! Each variant's discriminant matches the seed row id in the corresponding
//! `*_statuses` table, and its wire name matches the `name` column.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

/// Error returned when a status name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownStatus {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Look up a variant by its database status ID.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Wire / lookup-table name of the status.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownStatus;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $wire => Ok(Self::$variant), )+
                    other => Err(UnknownStatus {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

define_status_enum! {
    /// Alert lifecycle status.
    ///
    /// `Active` is the only non-terminal state.
    AlertStatus ("alert status") {
        Active = 1 => "active",
        Resolved = 2 => "resolved",
        FalseAlarm = 3 => "false_alarm",
    }
}

define_status_enum! {
    /// Per-contact delivery status of an emergency notification.
    ///
    /// `Sent` means the attempt was recorded; `Delivered` means the SMTP
    /// transport accepted the message.
    NotificationStatus ("notification status") {
        Sent = 1 => "sent",
        Delivered = 2 => "delivered",
        Failed = 3 => "failed",
    }
}

impl AlertStatus {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }

    /// `active -> resolved | false_alarm`; nothing leaves a terminal state.
    pub fn can_transition_to(self, next: AlertStatus) -> bool {
        self == Self::Active && next.is_terminal()
    }
}

impl NotificationStatus {
    /// Whether the delivery attempt has a final outcome.
    pub fn is_final(self) -> bool {
        !matches!(self, Self::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_status_ids_match_seed_order() {
        assert_eq!(AlertStatus::Active.id(), 1);
        assert_eq!(AlertStatus::Resolved.id(), 2);
        assert_eq!(AlertStatus::FalseAlarm.id(), 3);
        assert_eq!(AlertStatus::from_id(3), Some(AlertStatus::FalseAlarm));
        assert_eq!(AlertStatus::from_id(9), None);
    }

    #[test]
    fn alert_status_parses_wire_names() {
        assert_eq!("false_alarm".parse(), Ok(AlertStatus::FalseAlarm));
        let err = "closed".parse::<AlertStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown alert status 'closed'");
    }

    #[test]
    fn alert_status_serializes_snake_case() {
        let json = serde_json::to_string(&AlertStatus::FalseAlarm).unwrap();
        assert_eq!(json, "\"false_alarm\"");
    }

    #[test]
    fn only_active_can_transition() {
        assert!(AlertStatus::Active.can_transition_to(AlertStatus::Resolved));
        assert!(AlertStatus::Active.can_transition_to(AlertStatus::FalseAlarm));
        assert!(!AlertStatus::Active.can_transition_to(AlertStatus::Active));
        assert!(!AlertStatus::Resolved.can_transition_to(AlertStatus::FalseAlarm));
        assert!(!AlertStatus::FalseAlarm.can_transition_to(AlertStatus::Resolved));
    }

    #[test]
    fn notification_status_finality() {
        assert!(!NotificationStatus::Sent.is_final());
        assert!(NotificationStatus::Delivered.is_final());
        assert!(NotificationStatus::Failed.is_final());
    }
}
