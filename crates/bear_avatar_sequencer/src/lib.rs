// SPDX-License-Identifier: MIT OR Apache-2.0
//! Focus-driven sprite sequencer for the bear login avatar.
//!
//! The avatar reacts to the login form: it follows the email cursor,
//! covers its eyes when the password field gains focus, and peeks when
//! the password is shown in clear text.
//!
//! ## Architecture
//!
//! The sequencer is built on:
//! - Catalog of three numerically sorted frame sequences
//! - Pure reducer over focus, visibility and progress inputs
//! - Cancelable, generation-tagged timelines
//! - Virtual-clock timer queue driven by the host
//! - Read projection for the presentational layer

pub mod avatar;
pub mod catalog;
pub mod config;
pub mod frame;
pub mod sequencer;
pub mod state;
pub mod timeline;
pub mod timer;

pub use avatar::{Avatar, AvatarImage, AvatarView, AVATAR_ALT_TEXT, DEFAULT_AVATAR_SIZE};
pub use catalog::{AssetSource, CatalogPatterns, FrameCatalog, FramePattern, MemoryAssetSource};
pub use config::{ConfigError, SequencerConfig, CONFIG_FILE_NAME, CONFIG_FORMAT_VERSION};
pub use frame::{numeric_key, FrameRef, FrameSequence, SequenceKind};
pub use sequencer::{FrameObserver, FrameWrite, Sequencer};
pub use state::{watching_index, Effect, Focus, Input, Phase, SequencerState, Timing};
pub use timeline::{Continuation, Direction, Step, Timeline};
pub use timer::{Fired, TimerId, TimerQueue};
