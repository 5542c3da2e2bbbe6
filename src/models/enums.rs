use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(UserRole {
    Patient => "patient",
    Therapist => "therapist",
    Admin => "admin",
});

str_enum!(VitalsSource {
    Manual => "manual",
    Device => "device",
    Import => "import",
});

str_enum!(MealType {
    Breakfast => "breakfast",
    Lunch => "lunch",
    Dinner => "dinner",
    Snack => "snack",
    Beverage => "beverage",
});

str_enum!(SleepQuality {
    Poor => "poor",
    Fair => "fair",
    Good => "good",
    Excellent => "excellent",
});

str_enum!(MedicationLogStatus {
    Scheduled => "scheduled",
    Taken => "taken",
    Missed => "missed",
    Skipped => "skipped",
});

// Every table that carries a derived post_surgery_day column.
str_enum!(RecordKind {
    Vitals => "vitals",
    Meal => "meal",
    Sleep => "sleep",
    Exercise => "exercise",
    Medication => "medication",
    Hydration => "hydration",
    DailyScore => "daily_score",
});

impl RecordKind {
    pub const ALL: [RecordKind; 7] = [
        RecordKind::Vitals,
        RecordKind::Meal,
        RecordKind::Sleep,
        RecordKind::Exercise,
        RecordKind::Medication,
        RecordKind::Hydration,
        RecordKind::DailyScore,
    ];

    /// Sleep nights, hydration tallies and daily scores are keyed by
    /// calendar date; everything else by instant.
    pub fn is_date_only(&self) -> bool {
        matches!(self, RecordKind::Sleep | RecordKind::Hydration | RecordKind::DailyScore)
    }
}

str_enum!(DerivedField {
    PostSurgeryDay => "post_surgery_day",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn round_trips_through_as_str() {
        for kind in RecordKind::ALL {
            assert_eq!(RecordKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert_eq!(MealType::from_str("snack").unwrap(), MealType::Snack);
    }

    #[test]
    fn unknown_value_is_invalid_enum() {
        let err = SleepQuality::from_str("amazing").unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEnum { ref field, .. } if field == "SleepQuality"));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&MedicationLogStatus::Skipped).unwrap();
        assert_eq!(json, "\"skipped\"");
    }

    #[test]
    fn day_keyed_kinds_are_date_only() {
        let date_only: Vec<_> = RecordKind::ALL.iter().filter(|k| k.is_date_only()).collect();
        assert_eq!(
            date_only,
            vec![&RecordKind::Sleep, &RecordKind::Hydration, &RecordKind::DailyScore]
        );
    }
}
