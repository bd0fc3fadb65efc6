use serde_json::{Map, Value};

/// Alternate source fields for each required field, tried in order.
pub const ALTERNATES: &[(&str, &[&str])] = &[
    ("excerpt", &["summary", "description"]),
    ("content", &["body", "text"]),
    ("title", &["headline"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repair {
    pub field: &'static str,
    pub from: &'static str,
}

/// Copy an alternate value into every missing or null required field that
/// has one. The alternate field itself is left in place.
pub fn repair_record(record: &mut Map<String, Value>) -> Vec<Repair> {
    let mut repairs = Vec::new();
    for (field, alternates) in ALTERNATES {
        if record.get(*field).is_some_and(|v| !v.is_null()) {
            continue;
        }
        let found = alternates.iter().find_map(|alt| {
            record
                .get(*alt)
                .filter(|v| !v.is_null())
                .map(|v| (*alt, v.clone()))
        });
        if let Some((from, value)) = found {
            record.insert(field.to_string(), value);
            repairs.push(Repair { field, from });
        }
    }
    repairs
}
