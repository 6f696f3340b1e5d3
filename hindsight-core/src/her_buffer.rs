//! Replay buffer of hindsight experiences.
//!
//! [`HerReplayBuffer`] is a ring buffer of fixed capacity. Every item stored
//! gets a logical index, counting from zero over the lifetime of the buffer;
//! the item with logical index `l` lives in slot `l % capacity`. Once the
//! buffer is full, each store overwrites the oldest item.
//!
//! Sampling can be restricted to the most recent items, which is how
//! [`EreScheduler`](crate::ere::EreScheduler) windows are applied.
//!
//! ```
//! use hindsight_core::{
//!     experience::{Experience, GoalObs},
//!     her_buffer::{HerReplayBuffer, HerReplayBufferConfig},
//! };
//!
//! let config = HerReplayBufferConfig::default().capacity(3);
//! let mut buffer = HerReplayBuffer::new(&config).unwrap();
//!
//! for t in 0..5 {
//!     let obs = |v: f32| GoalObs::new(vec![v], vec![v], vec![10.]);
//!     let exp = Experience::new(obs(t as f32), vec![0.], -1., obs(t as f32 + 1.), false);
//!     buffer.store(&exp, -1., &[10.]).unwrap();
//! }
//! assert_eq!(buffer.len(), 3);
//! assert_eq!(buffer.total_inserted(), 5);
//!
//! let batch = buffer.sample(2, 2).unwrap();
//! assert!(batch.ixs.iter().all(|&l| l >= 3));
//! ```
mod base;
mod batch;
mod config;
pub use base::HerReplayBuffer;
pub use batch::HerBatch;
pub use config::HerReplayBufferConfig;
