//! # Blackboard — Cross-System Scratch Space
//!
//! Systems never call each other. When the input system wants the player to
//! move, it leaves a note on the blackboard and the movement system picks it
//! up later in the same frame.
//!
//! The blackboard has two halves:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Blackboard                                                   │
//! │                                                              │
//! │  values: HashMap<String, Value>                              │
//! │    "hud_toggle_request" → Bool(true)                         │
//! │    "exit_game_request"  → Bool(false)                        │
//! │                                                              │
//! │  queues: HashMap<TypeId, Box<dyn Any>>   (Vec<M> per type)   │
//! │    MovementRequest ─► [ {entity 1, x 200, y 0} ]              │
//! │    ShootRequest    ─► [ {entity 1, time 3.25} ]               │
//! │    CollisionEvent  ─► [ ... ]                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Keyed Values
//!
//! A tagged [`Value`] per string key. [`Blackboard::get`] and
//! [`Blackboard::get_as`] return a `Result`, so "never set" and "set to
//! false" stay distinguishable. The permissive read that turns a miss into
//! `T::default()` is still there, but only behind the explicitly named
//! [`Blackboard::value_or_default`].
//!
//! ## Message Queues
//!
//! Requests between systems are typed one-shot messages. A producer
//! [`post`](Blackboard::post)s; the single designated consumer
//! [`drain`](Blackboard::drain)s. Two producers in the same frame append to
//! the queue rather than overwriting each other, so no request is lost.
//!
//! The data structure doesn't enforce single-consumer. That is a
//! convention upheld by the fixed system order in the driver.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use super::entity::Entity;

// ── Values ───────────────────────────────────────────────────────────────

/// A dynamically-typed blackboard value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f32),
    Entity(Entity),
    Text(String),
}

impl Value {
    /// Name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Entity(_) => "entity",
            Value::Text(_) => "text",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<Entity> for Value {
    fn from(v: Entity) -> Self {
        Value::Entity(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// Types that can be read back out of a [`Value`].
pub trait FromValue: Sized {
    /// Name used in [`BlackboardError::WrongType`].
    const KIND: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for bool {
    const KIND: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    const KIND: &'static str = "int";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    const KIND: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for Entity {
    const KIND: &'static str = "entity";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Entity(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for String {
    const KIND: &'static str = "text";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

// ── Errors ───────────────────────────────────────────────────────────────

/// Why a keyed read failed.
#[derive(Debug, Clone, PartialEq)]
pub enum BlackboardError {
    NotFound(String),
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl fmt::Display for BlackboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlackboardError::NotFound(key) => write!(f, "blackboard key \"{}\" not found", key),
            BlackboardError::WrongType { key, expected, found } => write!(
                f,
                "blackboard key \"{}\" holds {}, expected {}",
                key, found, expected
            ),
        }
    }
}

impl std::error::Error for BlackboardError {}

// ── Well-known keys ──────────────────────────────────────────────────────

/// Set by the input system on H; consumed by the HUD.
pub const HUD_TOGGLE_REQUEST: &str = "hud_toggle_request";
/// Set by the input system on Escape; observed by the frame driver.
pub const EXIT_GAME_REQUEST: &str = "exit_game_request";

// ── Blackboard ───────────────────────────────────────────────────────────

/// Shared key/value scratch space plus typed one-shot message queues.
#[derive(Default)]
pub struct Blackboard {
    values: HashMap<String, Value>,
    queues: HashMap<TypeId, Box<dyn Any>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, overwriting any previous value of any type.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Result<&Value, BlackboardError> {
        self.values
            .get(key)
            .ok_or_else(|| BlackboardError::NotFound(key.to_string()))
    }

    /// Typed read. Fails on a missing key or a value of another type.
    pub fn get_as<T: FromValue>(&self, key: &str) -> Result<T, BlackboardError> {
        let value = self.get(key)?;
        T::from_value(value).ok_or_else(|| BlackboardError::WrongType {
            key: key.to_string(),
            expected: T::KIND,
            found: value.kind(),
        })
    }

    /// Permissive read: `T::default()` when the key is absent or holds
    /// another type. A miss is indistinguishable from a stored default, so
    /// prefer [`get_as`](Self::get_as) unless that is exactly what you want.
    pub fn value_or_default<T: FromValue + Default>(&self, key: &str) -> T {
        self.get_as(key).unwrap_or_default()
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Remove `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Read a boolean flag and reset it. Returns `true` only if the flag was
    /// present and set.
    pub fn take_flag(&mut self, key: &str) -> bool {
        match self.values.remove(key) {
            Some(Value::Bool(v)) => v,
            Some(other) => {
                log::debug!("Flag \"{}\" held {}, treating as unset", key, other.kind());
                false
            }
            None => false,
        }
    }

    /// Drop every keyed value and every pending message.
    pub fn clear(&mut self) {
        self.values.clear();
        self.queues.clear();
    }

    // ── Message queues ───────────────────────────────────────────────

    /// Append a one-shot message for its consumer.
    pub fn post<M: 'static>(&mut self, message: M) {
        self.queue_mut::<M>().push(message);
    }

    /// Take every pending message of type `M`, oldest first.
    pub fn drain<M: 'static>(&mut self) -> Vec<M> {
        self.queues
            .get_mut(&TypeId::of::<M>())
            .and_then(|q| q.downcast_mut::<Vec<M>>())
            .map(std::mem::take)
            .unwrap_or_default()
    }

    /// Look at pending messages without consuming them.
    pub fn peek<M: 'static>(&self) -> &[M] {
        self.queues
            .get(&TypeId::of::<M>())
            .and_then(|q| q.downcast_ref::<Vec<M>>())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of pending messages of type `M`.
    pub fn pending<M: 'static>(&self) -> usize {
        self.peek::<M>().len()
    }

    fn queue_mut<M: 'static>(&mut self) -> &mut Vec<M> {
        let queue = self
            .queues
            .entry(TypeId::of::<M>())
            .or_insert_with(|| Box::new(Vec::<M>::new()));
        match queue.downcast_mut::<Vec<M>>() {
            Some(q) => q,
            None => panic!(
                "Blackboard queue mismatch: expected `Vec<{}>`",
                std::any::type_name::<M>()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Ping(u32);

    #[derive(Debug, PartialEq)]
    struct Pong;

    #[test]
    fn round_trip() {
        let mut bb = Blackboard::new();
        bb.set("k", 5);
        assert_eq!(bb.get("k"), Ok(&Value::Int(5)));
        assert_eq!(bb.get_as::<i64>("k"), Ok(5));
        bb.remove("k");
        assert!(!bb.has("k"));
    }

    #[test]
    fn missing_key_is_an_error() {
        let bb = Blackboard::new();
        assert_eq!(
            bb.get_as::<bool>("shoot_request"),
            Err(BlackboardError::NotFound("shoot_request".into()))
        );
    }

    #[test]
    fn wrong_type_is_an_error() {
        let mut bb = Blackboard::new();
        bb.set("speed", 2.5_f32);
        let err = bb.get_as::<bool>("speed").unwrap_err();
        assert_eq!(
            err,
            BlackboardError::WrongType {
                key: "speed".into(),
                expected: "bool",
                found: "float",
            }
        );
        assert!(err.to_string().contains("expected bool"));
    }

    #[test]
    fn permissive_default_only_when_asked() {
        let mut bb = Blackboard::new();
        bb.set("speed", 2.5_f32);
        assert!(!bb.value_or_default::<bool>("speed"));
        assert!(!bb.value_or_default::<bool>("never_set"));
        assert_eq!(bb.value_or_default::<f32>("speed"), 2.5);
        assert_eq!(bb.value_or_default::<Entity>("nobody"), Entity::NONE);
    }

    #[test]
    fn set_overwrites_across_types() {
        let mut bb = Blackboard::new();
        bb.set("x", true);
        bb.set("x", "hello");
        assert_eq!(bb.get_as::<String>("x"), Ok("hello".to_string()));
    }

    #[test]
    fn take_flag_resets() {
        let mut bb = Blackboard::new();
        assert!(!bb.take_flag(HUD_TOGGLE_REQUEST));
        bb.set(HUD_TOGGLE_REQUEST, true);
        assert!(bb.take_flag(HUD_TOGGLE_REQUEST));
        assert!(!bb.has(HUD_TOGGLE_REQUEST));
        bb.set(HUD_TOGGLE_REQUEST, 1);
        assert!(!bb.take_flag(HUD_TOGGLE_REQUEST));
    }

    #[test]
    fn queued_messages_are_not_lost() {
        let mut bb = Blackboard::new();
        bb.post(Ping(1));
        bb.post(Ping(2));
        bb.post(Pong);
        assert_eq!(bb.pending::<Ping>(), 2);
        assert_eq!(bb.peek::<Ping>(), &[Ping(1), Ping(2)]);
        assert_eq!(bb.drain::<Ping>(), vec![Ping(1), Ping(2)]);
        assert!(bb.drain::<Ping>().is_empty());
        assert_eq!(bb.pending::<Pong>(), 1);
    }

    #[test]
    fn drain_of_unknown_type_is_empty() {
        let mut bb = Blackboard::new();
        assert!(bb.drain::<Ping>().is_empty());
        assert!(bb.peek::<Ping>().is_empty());
    }

    #[test]
    fn clear_drops_values_and_queues() {
        let mut bb = Blackboard::new();
        bb.set("a", 1);
        bb.post(Ping(7));
        bb.clear();
        assert!(!bb.has("a"));
        assert_eq!(bb.pending::<Ping>(), 0);
    }
}
