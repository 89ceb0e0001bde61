//! Activity and roster domain models
//!
//! The backend sends the roster as a JSON object keyed by activity name.
//! `Roster` keeps the entries in the order the server sent them, which a
//! plain map would not.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Placeholder rendered for an activity nobody has joined yet
pub const NO_PARTICIPANTS: &str = "No participants yet";

/// An extracurricular activity as last reported by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub max_participants: i64,
    pub participants: Vec<String>,
}

/// Wire shape of one roster entry (the name is the map key)
#[derive(Debug, Deserialize)]
struct ActivityRecord {
    #[serde(default)]
    description: String,
    #[serde(default)]
    schedule: String,
    max_participants: i64,
    #[serde(default)]
    participants: Vec<String>,
}

#[derive(Serialize)]
struct ActivityRecordRef<'a> {
    description: &'a str,
    schedule: &'a str,
    max_participants: i64,
    participants: &'a [String],
}

impl Activity {
    pub fn new(name: impl Into<String>, max_participants: i64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            schedule: String::new(),
            max_participants,
            participants: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_schedule(mut self, schedule: impl Into<String>) -> Self {
        self.schedule = schedule.into();
        self
    }

    pub fn with_participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants = participants.into_iter().map(Into::into).collect();
        self
    }

    /// Remaining capacity. Negative when the server has overbooked.
    pub fn spots_left(&self) -> i64 {
        self.max_participants - self.participants.len() as i64
    }

    pub fn has_participant(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }

    fn from_record(name: String, record: ActivityRecord) -> Self {
        Self {
            name,
            description: record.description,
            schedule: record.schedule,
            max_participants: record.max_participants,
            participants: record.participants,
        }
    }
}

/// The full set of activities from one fetch, in server order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    activities: Vec<Activity>,
}

impl Roster {
    pub fn new(activities: Vec<Activity>) -> Self {
        let mut builder = RosterBuilder::with_capacity(activities.len());
        for activity in activities {
            builder.upsert(activity);
        }
        builder.finish()
    }

    pub fn get(&self, name: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Activity> {
        self.activities.iter_mut().find(|a| a.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// One entry per activity, for the activity-selection control
    pub fn names(&self) -> Vec<String> {
        self.activities.iter().map(|a| a.name.clone()).collect()
    }

    /// Build the display cards for every activity
    pub fn cards(&self) -> Vec<ActivityCard> {
        self.activities.iter().map(ActivityCard::from_activity).collect()
    }
}

/// Collects activities by name. A repeated name replaces the earlier
/// entry but keeps its position.
struct RosterBuilder {
    activities: Vec<Activity>,
    positions: HashMap<String, usize>,
}

impl RosterBuilder {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            activities: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    fn upsert(&mut self, activity: Activity) {
        match self.positions.get(&activity.name) {
            Some(&index) => self.activities[index] = activity,
            None => {
                self.positions.insert(activity.name.clone(), self.activities.len());
                self.activities.push(activity);
            }
        }
    }

    fn finish(self) -> Roster {
        Roster {
            activities: self.activities,
        }
    }
}

impl<'de> Deserialize<'de> for Roster {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RosterVisitor;

        impl<'de> Visitor<'de> for RosterVisitor {
            type Value = Roster;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of activity name to activity details")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Roster, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut builder = RosterBuilder::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, record)) = map.next_entry::<String, ActivityRecord>()? {
                    builder.upsert(Activity::from_record(name, record));
                }
                Ok(builder.finish())
            }
        }

        deserializer.deserialize_map(RosterVisitor)
    }
}

impl Serialize for Roster {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.activities.len()))?;
        for activity in &self.activities {
            map.serialize_entry(
                &activity.name,
                &ActivityRecordRef {
                    description: &activity.description,
                    schedule: &activity.schedule,
                    max_participants: activity.max_participants,
                    participants: &activity.participants,
                },
            )?;
        }
        map.end()
    }
}

/// A participant line with its removal affordance
///
/// Rows are rebuilt on every render, so the `(activity, email)` pair always
/// refers to the roster that is currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantRow {
    pub activity: String,
    pub email: String,
}

/// Everything a view needs to draw one activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityCard {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub spots_left: i64,
    pub participants: Vec<ParticipantRow>,
}

impl ActivityCard {
    pub fn from_activity(activity: &Activity) -> Self {
        Self {
            name: activity.name.clone(),
            description: activity.description.clone(),
            schedule: activity.schedule.clone(),
            spots_left: activity.spots_left(),
            participants: activity
                .participants
                .iter()
                .map(|email| ParticipantRow {
                    activity: activity.name.clone(),
                    email: email.clone(),
                })
                .collect(),
        }
    }

    /// e.g. "9 spots left"
    pub fn availability(&self) -> String {
        format!("{} spots left", self.spots_left)
    }
}
