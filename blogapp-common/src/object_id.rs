//! Module for working with 12-byte object ids.
//!
//! An object id is laid out as a 4-byte big-endian unix timestamp in seconds,
//! a 5-byte value that is random per generator, and a 3-byte big-endian counter.
//! Ids handed out by one generator therefore sort by creation.

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{Error, Unexpected},
};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
    sync::atomic::{AtomicU32, Ordering},
};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

pub const OBJECT_ID_LEN: usize = 12;
pub const OBJECT_ID_HEX_LEN: usize = OBJECT_ID_LEN * 2;

pub const TIMESTAMP_OFFSET: usize = 0;
pub const TIMESTAMP_LENGTH: usize = 4;

pub const PROCESS_UNIQUE_OFFSET: usize = 4;
pub const PROCESS_UNIQUE_LENGTH: usize = 5;

pub const COUNTER_OFFSET: usize = 9;
pub const COUNTER_LENGTH: usize = 3;
pub const COUNTER_BITMASK: u32 = 0x00FF_FFFF;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Error)]
pub enum ObjectIdTimestampError {
    #[error("Specified time was before the unix epoch.")]
    TimeBeforeEpoch,
    #[error("Resulting timestamp uses too many bits.")]
    TimestampTooLarge,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Error)]
pub enum ObjectIdParseError {
    #[error("Expected 24 hex characters, got {0} bytes")]
    InvalidLength(usize),
    #[error("Object id contained a non-hex character")]
    InvalidCharacter,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct ObjectIdTimestamp(u32);

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct ProcessUnique([u8; PROCESS_UNIQUE_LENGTH]);

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct ObjectIdCounter(u32);

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

impl ObjectIdTimestamp {
    #[must_use]
    pub fn new(seconds: u32) -> Self {
        Self(seconds)
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    pub fn now() -> Result<Self, ObjectIdTimestampError> {
        Self::try_from(OffsetDateTime::now_utc())
    }
}

impl TryFrom<OffsetDateTime> for ObjectIdTimestamp {
    type Error = ObjectIdTimestampError;

    fn try_from(value: OffsetDateTime) -> Result<Self, Self::Error> {
        let seconds = value.unix_timestamp();
        if seconds < 0 {
            return Err(Self::Error::TimeBeforeEpoch);
        }
        u32::try_from(seconds)
            .map(Self)
            .map_err(|_| Self::Error::TimestampTooLarge)
    }
}

impl From<ObjectIdTimestamp> for OffsetDateTime {
    fn from(value: ObjectIdTimestamp) -> Self {
        OffsetDateTime::UNIX_EPOCH + Duration::seconds(i64::from(value.0))
    }
}

impl ProcessUnique {
    #[must_use]
    pub fn new(bytes: [u8; PROCESS_UNIQUE_LENGTH]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn random() -> Self {
        Self(rand::random())
    }

    #[must_use]
    pub fn get(self) -> [u8; PROCESS_UNIQUE_LENGTH] {
        self.0
    }
}

impl ObjectIdCounter {
    #[must_use]
    pub fn new(value: u32) -> Option<Self> {
        (value <= COUNTER_BITMASK).then_some(Self(value))
    }

    #[must_use]
    pub fn new_unchecked(value: u32) -> Self {
        Self::new(value).expect("ObjectIdCounter out of range.")
    }

    /// Keeps only the low 24 bits of `value`.
    #[must_use]
    pub fn new_masked(value: u32) -> Self {
        Self(value & COUNTER_BITMASK)
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::new_masked(self.0 + 1)
    }
}

impl ObjectId {
    #[must_use]
    pub fn from_bytes(bytes: [u8; OBJECT_ID_LEN]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn from_parts(
        timestamp: ObjectIdTimestamp,
        process_unique: ProcessUnique,
        counter: ObjectIdCounter,
    ) -> Self {
        let mut bytes = [0; OBJECT_ID_LEN];
        bytes[TIMESTAMP_OFFSET..TIMESTAMP_OFFSET + TIMESTAMP_LENGTH]
            .copy_from_slice(&timestamp.get().to_be_bytes());
        bytes[PROCESS_UNIQUE_OFFSET..PROCESS_UNIQUE_OFFSET + PROCESS_UNIQUE_LENGTH]
            .copy_from_slice(&process_unique.get());
        // The counter is a u32, only its low three bytes are kept.
        bytes[COUNTER_OFFSET..COUNTER_OFFSET + COUNTER_LENGTH]
            .copy_from_slice(&counter.get().to_be_bytes()[1..]);

        Self(bytes)
    }

    #[must_use]
    pub fn bytes(self) -> [u8; OBJECT_ID_LEN] {
        self.0
    }

    #[must_use]
    pub fn timestamp(self) -> ObjectIdTimestamp {
        let [a, b, c, d, ..] = self.0;
        ObjectIdTimestamp(u32::from_be_bytes([a, b, c, d]))
    }

    #[must_use]
    pub fn process_unique(self) -> ProcessUnique {
        let mut bytes = [0; PROCESS_UNIQUE_LENGTH];
        bytes.copy_from_slice(
            &self.0[PROCESS_UNIQUE_OFFSET..PROCESS_UNIQUE_OFFSET + PROCESS_UNIQUE_LENGTH],
        );
        ProcessUnique(bytes)
    }

    #[must_use]
    pub fn counter(self) -> ObjectIdCounter {
        let [.., a, b, c] = self.0;
        ObjectIdCounter(u32::from_be_bytes([0, a, b, c]))
    }

    #[must_use]
    pub fn into_parts(self) -> (ObjectIdTimestamp, ProcessUnique, ObjectIdCounter) {
        (self.timestamp(), self.process_unique(), self.counter())
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != OBJECT_ID_HEX_LEN {
            return Err(Self::Err::InvalidLength(s.len()));
        }

        let mut bytes = [0; OBJECT_ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| Self::Err::InvalidCharacter)?;

        Ok(Self(bytes))
    }
}

impl Serialize for ObjectId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        inner
            .parse()
            .map_err(|_| Error::invalid_value(Unexpected::Str(&inner), &"a 24 digit hex ObjectId"))
    }
}

/// Hands out [`ObjectId`]s. Safe to share between tasks.
#[derive(Debug)]
pub struct ObjectIdGenerator {
    process_unique: ProcessUnique,
    next_counter: AtomicU32,
}

impl ObjectIdGenerator {
    #[must_use]
    pub fn new(process_unique: ProcessUnique, first_counter: ObjectIdCounter) -> Self {
        Self {
            process_unique,
            next_counter: AtomicU32::new(first_counter.get()),
        }
    }

    #[must_use]
    pub fn random() -> Self {
        Self::new(
            ProcessUnique::random(),
            ObjectIdCounter::new_masked(rand::random()),
        )
    }

    #[must_use]
    pub fn process_unique(&self) -> ProcessUnique {
        self.process_unique
    }

    pub fn generate_at(&self, time: OffsetDateTime) -> Result<ObjectId, ObjectIdTimestampError> {
        let timestamp = ObjectIdTimestamp::try_from(time)?;
        // u32 wraparound is a multiple of 2^24, so masking keeps the sequence contiguous.
        let counter =
            ObjectIdCounter::new_masked(self.next_counter.fetch_add(1, Ordering::Relaxed));

        Ok(ObjectId::from_parts(timestamp, self.process_unique, counter))
    }

    pub fn generate(&self) -> Result<ObjectId, ObjectIdTimestampError> {
        self.generate_at(OffsetDateTime::now_utc())
    }
}

impl Default for ObjectIdGenerator {
    fn default() -> Self {
        Self::random()
    }
}
