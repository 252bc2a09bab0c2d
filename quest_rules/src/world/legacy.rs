//! Compatibility layer for older data files.
//!
//! Early data stored tuple fields as stringified literals such as
//! `"(None, 1, 2, None)"` or `"('Coat', 3)"`, and overloaded the integer
//! `-100` to mean "no event" / "back to the map". The serde adapters here
//! accept both that form and plain JSON arrays, and decode the sentinels into
//! typed values.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map, map_res, opt, recognize, value},
    multi::separated_list0,
    sequence::{delimited, pair, terminated},
    IResult,
};
use serde::{de, Deserialize, Deserializer, Serializer};
use thiserror::Error;

use super::Directions;
use crate::entities::{EventId, MapPointId};
use crate::mechanics::{ItemCheck, NextStep};

/// Legacy id meaning "no event here" on a map point and "return to the map"
/// on an event option.
pub const NO_EVENT_SENTINEL: i64 = -100;

/// A value parsed from a stringified literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    None,
    Int(i64),
    Str(String),
    Seq(Vec<Literal>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid literal `{input}`")]
pub struct LiteralError {
    pub input: String,
}

/// Parse a stringified literal (tuple, list, integer, string or `None`).
pub fn parse_literal(input: &str) -> Result<Literal, LiteralError> {
    all_consuming(padded(literal))(input)
        .map(|(_, parsed)| parsed)
        .map_err(|_| LiteralError {
            input: input.to_string(),
        })
}

fn padded<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn literal(input: &str) -> IResult<&str, Literal> {
    alt((none_literal, int_literal, str_literal, seq_literal))(input)
}

fn none_literal(input: &str) -> IResult<&str, Literal> {
    value(Literal::None, alt((tag("None"), tag("null"))))(input)
}

fn int_literal(input: &str) -> IResult<&str, Literal> {
    map_res(recognize(pair(opt(char('-')), digit1)), |digits: &str| {
        digits.parse::<i64>().map(Literal::Int)
    })(input)
}

fn str_literal(input: &str) -> IResult<&str, Literal> {
    map(
        alt((
            delimited(char('\''), take_until("'"), char('\'')),
            delimited(char('"'), take_until("\""), char('"')),
        )),
        |text: &str| Literal::Str(text.to_string()),
    )(input)
}

fn seq_literal(input: &str) -> IResult<&str, Literal> {
    map(
        alt((
            delimited(char('('), seq_items, char(')')),
            delimited(char('['), seq_items, char(']')),
        )),
        Literal::Seq,
    )(input)
}

fn seq_items(input: &str) -> IResult<&str, Vec<Literal>> {
    terminated(
        separated_list0(char(','), padded(literal)),
        pair(opt(char(',')), multispace0),
    )(input)
}

fn parse_text<E: de::Error>(text: &str) -> Result<Literal, E> {
    parse_literal(text).map_err(E::custom)
}

fn literal_id<E: de::Error>(literal: &Literal) -> Result<Option<i64>, E> {
    match literal {
        Literal::None => Ok(None),
        Literal::Int(id) => Ok(Some(*id)),
        other => Err(E::custom(format!("expected an id or None, found {other:?}"))),
    }
}

fn to_index<E: de::Error>(id: i64, what: &str) -> Result<usize, E> {
    usize::try_from(id).map_err(|_| E::custom(format!("negative {what} id {id}")))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TupleField<T> {
    Structured(T),
    Stringified(String),
}

/// `[x, y]` or `"(x, y)"`.
pub fn deserialize_center<'de, D>(deserializer: D) -> Result<(i32, i32), D::Error>
where
    D: Deserializer<'de>,
{
    match TupleField::<(i32, i32)>::deserialize(deserializer)? {
        TupleField::Structured(center) => Ok(center),
        TupleField::Stringified(text) => match parse_text::<D::Error>(&text)? {
            Literal::Seq(items) => match items.as_slice() {
                [Literal::Int(x), Literal::Int(y)] => {
                    let x = i32::try_from(*x).map_err(de::Error::custom)?;
                    let y = i32::try_from(*y).map_err(de::Error::custom)?;
                    Ok((x, y))
                }
                _ => Err(de::Error::custom(format!("center must be two integers: {text}"))),
            },
            _ => Err(de::Error::custom(format!("center must be a tuple: {text}"))),
        },
    }
}

/// Four positional targets, as an array or a stringified tuple.
pub fn deserialize_directions<'de, D>(deserializer: D) -> Result<Directions, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Option<i64>> = match TupleField::<Vec<Option<i64>>>::deserialize(deserializer)? {
        TupleField::Structured(ids) => ids,
        TupleField::Stringified(text) => match parse_text::<D::Error>(&text)? {
            Literal::Seq(items) => items
                .iter()
                .map(literal_id::<D::Error>)
                .collect::<Result<_, _>>()?,
            _ => return Err(de::Error::custom(format!("directions must be a tuple: {text}"))),
        },
    };

    if raw.len() != 4 {
        return Err(de::Error::invalid_length(raw.len(), &"exactly 4 directions"));
    }

    let mut targets = [None; 4];
    for (slot, id) in targets.iter_mut().zip(raw) {
        *slot = id
            .map(|id| to_index::<D::Error>(id, "map point").map(MapPointId))
            .transpose()?;
    }
    Ok(Directions::new(targets))
}

/// `null` or `-100` mean no event; any other id must be non-negative.
pub fn deserialize_special_event<'de, D>(deserializer: D) -> Result<Option<EventId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<i64>::deserialize(deserializer)? {
        None | Some(NO_EVENT_SENTINEL) => Ok(None),
        Some(id) => to_index::<D::Error>(id, "event").map(|id| Some(EventId(id))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NextStepField {
    Id(i64),
    Keyword(String),
}

/// Decode an option's `result_event_id`.
///
/// An id continues to that event, `-100` or `"map"` returns to the map, and
/// `null` or `"end"` ends the game.
pub fn deserialize_next_step<'de, D>(deserializer: D) -> Result<NextStep, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NextStepField>::deserialize(deserializer)? {
        None => Ok(NextStep::End),
        Some(NextStepField::Id(NO_EVENT_SENTINEL)) => Ok(NextStep::ReturnToMap),
        Some(NextStepField::Id(id)) => {
            to_index::<D::Error>(id, "event").map(|id| NextStep::Continue(EventId(id)))
        }
        Some(NextStepField::Keyword(keyword)) => match keyword.as_str() {
            "map" => Ok(NextStep::ReturnToMap),
            "end" => Ok(NextStep::End),
            other => Err(de::Error::unknown_variant(other, &["map", "end"])),
        },
    }
}

/// Write a [`NextStep`] in the same shape [`deserialize_next_step`] reads.
pub fn serialize_next_step<S>(next: &NextStep, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match next {
        NextStep::Continue(id) => serializer.serialize_u64(id.0 as u64),
        NextStep::ReturnToMap => serializer.serialize_str("map"),
        NextStep::End => serializer.serialize_none(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ItemCheckField {
    Pair(String, i32),
    Record { item: String, reduction: i32 },
    Stringified(String),
}

/// `["Coat", 3]`, `{"item": "Coat", "reduction": 3}`, `"('Coat', 3)"` or
/// `null`.
pub fn deserialize_item_check<'de, D>(deserializer: D) -> Result<Option<ItemCheck>, D::Error>
where
    D: Deserializer<'de>,
{
    let field = match Option::<ItemCheckField>::deserialize(deserializer)? {
        Some(field) => field,
        None => return Ok(None),
    };

    match field {
        ItemCheckField::Pair(item, reduction) | ItemCheckField::Record { item, reduction } => {
            Ok(Some(ItemCheck::new(item, reduction)))
        }
        ItemCheckField::Stringified(text) => match parse_text::<D::Error>(&text)? {
            Literal::None => Ok(None),
            Literal::Seq(items) => match items.as_slice() {
                [Literal::Str(item), Literal::Int(reduction)] => {
                    let reduction = i32::try_from(*reduction).map_err(de::Error::custom)?;
                    Ok(Some(ItemCheck::new(item.clone(), reduction)))
                }
                _ => Err(de::Error::custom(format!(
                    "item check must be (name, reduction): {text}"
                ))),
            },
            _ => Err(de::Error::custom(format!("item check must be a tuple: {text}"))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_direction_tuple() {
        let parsed = parse_literal("(None, 1, 12, None)").unwrap();
        assert_eq!(
            parsed,
            Literal::Seq(vec![
                Literal::None,
                Literal::Int(1),
                Literal::Int(12),
                Literal::None,
            ])
        );
    }

    #[test]
    fn test_parse_item_check_tuple() {
        let parsed = parse_literal(" ('Coat', 3) ").unwrap();
        assert_eq!(
            parsed,
            Literal::Seq(vec![Literal::Str("Coat".into()), Literal::Int(3)])
        );
    }

    #[test]
    fn test_parse_nested_and_trailing_comma() {
        let parsed = parse_literal("[(-100,), \"a b\", []]").unwrap();
        assert_eq!(
            parsed,
            Literal::Seq(vec![
                Literal::Seq(vec![Literal::Int(-100)]),
                Literal::Str("a b".into()),
                Literal::Seq(vec![]),
            ])
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_literal("(1, 2").is_err());
        assert!(parse_literal("(1 2)").is_err());
        assert!(parse_literal("Nothing").is_err());
    }

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "deserialize_directions")]
        directions: Directions,
        #[serde(default, deserialize_with = "deserialize_special_event")]
        special_event: Option<EventId>,
        #[serde(deserialize_with = "deserialize_next_step")]
        next: NextStep,
        #[serde(default, deserialize_with = "deserialize_item_check")]
        item_check: Option<ItemCheck>,
    }

    #[test]
    fn test_stringified_and_structured_forms_agree() {
        let legacy: Probe = serde_json::from_str(
            r#"{"directions": "(None, 1, 2, None)", "special_event": -100,
                "next": -100, "item_check": "('Coat', 3)"}"#,
        )
        .unwrap();
        let modern: Probe = serde_json::from_str(
            r#"{"directions": [null, 1, 2, null], "special_event": null,
                "next": "map", "item_check": ["Coat", 3]}"#,
        )
        .unwrap();

        assert_eq!(legacy.directions, modern.directions);
        assert_eq!(legacy.special_event, None);
        assert_eq!(modern.special_event, None);
        assert_eq!(legacy.next, NextStep::ReturnToMap);
        assert_eq!(modern.next, NextStep::ReturnToMap);
        assert_eq!(legacy.item_check, Some(ItemCheck::new("Coat", 3)));
        assert_eq!(legacy.item_check, modern.item_check);
    }

    #[test]
    fn test_next_step_decoding() {
        let end: Probe =
            serde_json::from_str(r#"{"directions": [null, null, null, null], "next": null}"#)
                .unwrap();
        assert_eq!(end.next, NextStep::End);

        let cont: Probe =
            serde_json::from_str(r#"{"directions": [null, null, null, null], "next": 7}"#)
                .unwrap();
        assert_eq!(cont.next, NextStep::Continue(EventId(7)));
    }

    #[test]
    fn test_directions_must_have_four_slots() {
        let result: Result<Probe, _> =
            serde_json::from_str(r#"{"directions": [1, 2, 3], "next": null}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_ids_rejected() {
        let result: Result<Probe, _> = serde_json::from_str(
            r#"{"directions": [null, null, null, null], "special_event": -3, "next": null}"#,
        );
        assert!(result.is_err());
    }
}
