//! Option path parsing and nested reads.
//!
//! A path such as `series[0].data[1].name` is split on `.`, `[` and `]`;
//! empty tokens are dropped. Tokens made only of ASCII digits become index
//! segments, everything else is a property key.

use std::fmt;
use std::str::FromStr;

use pest::Parser;
use pest_derive::Parser;
use serde_json::Value;

use crate::errors::{PathError, PathResult};

#[derive(Parser)]
#[grammar = "path.pest"]
pub struct PathParser;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    fn from_token(token: &str) -> Self {
        if token.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = token.parse::<usize>() {
                return Segment::Index(index);
            }
        }
        Segment::Key(token.to_string())
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }
}

/// A parsed option path. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn parse(source: &str) -> PathResult<Self> {
        let pairs = PathParser::parse(Rule::path, source).map_err(Box::new)?;
        let segments: Vec<Segment> = pairs
            .flat_map(|pair| pair.into_inner())
            .filter(|pair| pair.as_rule() == Rule::segment)
            .map(|pair| Segment::from_token(pair.as_str()))
            .collect();

        if segments.is_empty() {
            return Err(PathError::Empty(source.to_string()));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Single-axis convenience: `xAxis.title.text` addresses the first axis,
    /// i.e. `xAxis[0].title.text`. Reads and writes both go through here.
    pub fn normalized(&self) -> Path {
        let is_axis = matches!(
            self.segments.first(),
            Some(Segment::Key(key)) if key == "xAxis" || key == "yAxis"
        );
        let needs_index = matches!(self.segments.get(1), Some(Segment::Key(_)));

        if !(is_axis && needs_index) {
            return self.clone();
        }

        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.push(self.segments[0].clone());
        segments.push(Segment::Index(0));
        segments.extend(self.segments[1..].iter().cloned());
        Path { segments }
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{}", key)?,
                Segment::Key(key) => write!(f, ".{}", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Step one level into `current`. Indices only address arrays, keys only
/// address objects; anything else is a miss.
pub(crate) fn step<'a>(current: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (segment, current) {
        (Segment::Key(key), Value::Object(map)) => map.get(key),
        (Segment::Index(index), Value::Array(items)) => items.get(*index),
        _ => None,
    }
}

/// Read the value addressed by `path`. Any missing or `null` container on
/// the way short-circuits to `None`; a `null` leaf is also `None`.
pub fn get_nested_value<'a>(root: &'a Value, path: &Path) -> Option<&'a Value> {
    let path = path.normalized();
    let mut current = root;
    for segment in path.segments() {
        current = step(current, segment)?;
        if current.is_null() {
            return None;
        }
    }
    Some(current)
}
