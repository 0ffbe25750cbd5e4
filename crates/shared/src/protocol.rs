use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    domain::{format_time, parse_wire_time, Party},
    error::{FormError, ShapeError, UnknownVariant},
};

/// Field under which a list response wraps its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeKey {
    #[default]
    Data,
    Parties,
    #[serde(alias = "none")]
    Bare,
}

impl EnvelopeKey {
    pub fn field(self) -> Option<&'static str> {
        match self {
            Self::Data => Some("data"),
            Self::Parties => Some("parties"),
            Self::Bare => None,
        }
    }
}

impl FromStr for EnvelopeKey {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "data" => Ok(Self::Data),
            "parties" => Ok(Self::Parties),
            "none" | "bare" | "" => Ok(Self::Bare),
            other => Err(UnknownVariant::new("envelope key", other)),
        }
    }
}

/// How the create payload spells `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateEncoding {
    /// `YYYY-MM-DD`
    Date,
    /// `YYYY-MM-DDT00:00:00.000Z`
    #[default]
    Timestamp,
}

impl DateEncoding {
    pub fn encode(self, date: NaiveDate) -> String {
        match self {
            Self::Date => date.format("%Y-%m-%d").to_string(),
            Self::Timestamp => date.format("%Y-%m-%dT00:00:00.000Z").to_string(),
        }
    }
}

impl FromStr for DateEncoding {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "timestamp" | "datetime" => Ok(Self::Timestamp),
            other => Err(UnknownVariant::new("date encoding", other)),
        }
    }
}

/// Raw values as typed into the add-party form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartyForm {
    pub name: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
}

impl PartyForm {
    pub fn validate(&self) -> Result<NewParty, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingName);
        }

        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| FormError::InvalidDate(self.date.clone()))?;

        let time = match self.time.trim() {
            "" => None,
            raw => Some(
                parse_wire_time(raw).ok_or_else(|| FormError::InvalidTime(raw.to_string()))?,
            ),
        };

        Ok(NewParty {
            name: name.to_string(),
            date,
            time,
            location: self.location.trim().to_string(),
            description: self.description.trim().to_string(),
        })
    }
}

/// Create payload; the server assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParty {
    pub name: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub location: String,
    pub description: String,
}

impl NewParty {
    pub fn to_json(&self, encoding: DateEncoding) -> Value {
        let mut body = Map::new();
        body.insert("name".into(), Value::from(self.name.as_str()));
        body.insert("date".into(), Value::from(encoding.encode(self.date)));
        if let Some(time) = self.time {
            body.insert("time".into(), Value::from(format_time(time)));
        }
        body.insert("location".into(), Value::from(self.location.as_str()));
        body.insert("description".into(), Value::from(self.description.as_str()));
        Value::Object(body)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Pulls the party array out of a list response.
pub fn extract_party_list(body: Value, envelope: EnvelopeKey) -> Result<Vec<Party>, ShapeError> {
    let list = match envelope.field() {
        None => body,
        Some(field) => match body {
            Value::Object(mut map) => map
                .remove(field)
                .ok_or(ShapeError::MissingEnvelope(field))?,
            _ => return Err(ShapeError::MissingEnvelope(field)),
        },
    };

    if !list.is_array() {
        return Err(ShapeError::NotAnArray(json_kind(&list)));
    }
    Ok(serde_json::from_value(list)?)
}

/// Returns the created record when a create response echoes it, either
/// bare or under the envelope field.
pub fn extract_created_party(body: &Value, envelope: EnvelopeKey) -> Option<Party> {
    let candidate = if body.get("id").is_some() {
        body
    } else {
        body.get(envelope.field()?)?
    };
    if candidate.get("id").is_none() {
        return None;
    }
    serde_json::from_value(candidate.clone()).ok()
}
