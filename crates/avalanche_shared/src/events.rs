//! Track events handed from the generator to its consumers.
//!
//! The PHYSICS layer uses them to create and free colliders.
//! The RENDERER uses them to create and dispose meshes.

use crate::math::Vec3;
use serde::{Deserialize, Serialize};

/// Event type discriminator
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    /// Segment generated and appended to the active window
    SegmentSpawned = 0,
    /// Segment left the active window
    SegmentEvicted = 1,
}

/// Events emitted by the track stream
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TrackEvent {
    /// A new segment is ready to be instantiated.
    SegmentSpawned {
        /// Segment index
        index: u64,
        /// World-space origin of the segment
        origin: Vec3,
        /// Number of obstacle descriptors it carries
        obstacle_count: usize,
    },

    /// A segment is behind the player and its objects must be freed.
    SegmentEvicted {
        /// Segment index
        index: u64,
    },
}

impl TrackEvent {
    /// Returns the event type
    #[must_use]
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::SegmentSpawned { .. } => EventType::SegmentSpawned,
            Self::SegmentEvicted { .. } => EventType::SegmentEvicted,
        }
    }

    /// Returns the segment index this event refers to
    #[must_use]
    pub const fn segment_index(&self) -> u64 {
        match self {
            Self::SegmentSpawned { index, .. } | Self::SegmentEvicted { index } => *index,
        }
    }
}
