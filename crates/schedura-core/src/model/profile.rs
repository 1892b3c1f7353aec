//! User profile and preferences.
//!
//! Enum values also accept the display labels written by older data files
//! ("Strict Schedule", "Weekly Goals", ...).

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Part of the day the user works best in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductivityPeak {
    #[serde(alias = "Morning")]
    Morning,
    #[serde(alias = "Afternoon")]
    Afternoon,
    #[serde(alias = "Evening")]
    Evening,
    #[serde(alias = "Night")]
    Night,
}

impl ProductivityPeak {
    /// Hour window `[start, end)` covered by this peak.
    pub fn hours(&self) -> (u32, u32) {
        match self {
            Self::Morning => (8, 12),
            Self::Afternoon => (12, 17),
            Self::Evening => (17, 22),
            Self::Night => (20, 24),
        }
    }

    pub fn start_hour(&self) -> u32 {
        self.hours().0
    }
}

impl std::str::FromStr for ProductivityPeak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            "night" => Ok(Self::Night),
            other => Err(format!("unknown productivity peak: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkRoutine {
    #[serde(alias = "Strict Schedule")]
    Strict,
    #[default]
    #[serde(alias = "Flexible with Structure")]
    Flexible,
    #[serde(alias = "Completely Flexible")]
    CompletelyFlexible,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakFrequency {
    #[default]
    #[serde(alias = "Frequent Short Breaks")]
    FrequentShort,
    #[serde(alias = "Few Longer Breaks")]
    FewLonger,
    #[serde(alias = "Minimal Breaks")]
    Minimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalTimeframe {
    #[serde(alias = "Daily Goals")]
    Daily,
    #[default]
    #[serde(alias = "Weekly Goals")]
    Weekly,
    #[serde(alias = "Monthly Goals")]
    Monthly,
    #[serde(alias = "Quarterly Goals")]
    Quarterly,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitFormation {
    #[default]
    #[serde(alias = "Start Small")]
    StartSmall,
    #[serde(alias = "Moderate Changes")]
    Moderate,
    #[serde(alias = "Challenge Myself")]
    Challenge,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    #[serde(alias = "Dark Mode")]
    Dark,
    #[serde(alias = "Light Mode")]
    Light,
}

/// A single peak (older files) or a list of peaks.
fn one_or_many_peaks<'de, D>(deserializer: D) -> Result<Vec<ProductivityPeak>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(ProductivityPeak),
        Many(Vec<ProductivityPeak>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(peak)) => vec![peak],
        Some(OneOrMany::Many(peaks)) => peaks,
        None => Vec::new(),
    })
}

/// The user's profile. Overwritten as a whole from settings; never deleted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "productivity_peak", deserialize_with = "one_or_many_peaks")]
    pub productivity_peaks: Vec<ProductivityPeak>,
    #[serde(default)]
    pub work_routine: WorkRoutine,
    #[serde(default)]
    pub break_frequency: BreakFrequency,
    #[serde(default)]
    pub goal_timeframe: GoalTimeframe,
    #[serde(default)]
    pub habit_formation: HabitFormation,
    #[serde(default, alias = "health_priority")]
    pub health_priorities: Vec<String>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub onboarded_at: Option<NaiveDateTime>,
}

impl Profile {
    /// True until the user has entered a name.
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_object_yields_default_profile() {
        let profile: Profile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile, Profile::default());
        assert!(profile.is_empty());
        assert_eq!(profile.goal_timeframe, GoalTimeframe::Weekly);
    }

    #[test]
    fn peak_windows_match_day_parts() {
        assert_eq!(ProductivityPeak::Morning.hours(), (8, 12));
        assert_eq!(ProductivityPeak::Night.start_hour(), 20);
        assert_eq!("Evening".parse::<ProductivityPeak>(), Ok(ProductivityPeak::Evening));
        assert!("brunch".parse::<ProductivityPeak>().is_err());
    }

    #[test]
    fn onboarding_labels_and_singular_keys_load() {
        let json = serde_json::json!({
            "name": "Ada",
            "productivity_peak": "Evening",
            "work_routine": "Strict Schedule",
            "break_frequency": "Few Longer Breaks",
            "goal_timeframe": "Monthly Goals",
            "habit_formation": "Challenge Myself",
            "health_priority": ["Sleep", "Exercise"],
            "theme": "dark",
            "onboarded_at": "2024-03-01T08:30:00.123456"
        });
        let profile: Profile = serde_json::from_value(json).unwrap();
        assert_eq!(profile.productivity_peaks, vec![ProductivityPeak::Evening]);
        assert_eq!(profile.work_routine, WorkRoutine::Strict);
        assert_eq!(profile.break_frequency, BreakFrequency::FewLonger);
        assert_eq!(profile.goal_timeframe, GoalTimeframe::Monthly);
        assert_eq!(profile.habit_formation, HabitFormation::Challenge);
        assert_eq!(profile.health_priorities, vec!["Sleep", "Exercise"]);
        assert!(profile.onboarded_at.is_some());

        let saved = serde_json::to_value(&profile).unwrap();
        assert_eq!(saved["work_routine"], "strict");
        assert_eq!(saved["productivity_peaks"], serde_json::json!(["evening"]));
    }
}
