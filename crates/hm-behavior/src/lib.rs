//! `hm-behavior` — the per-agent travel decision engine.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                          |
//! |-----------------|-------------------------------------------------------------------|
//! | [`profile`]     | `Profile`, `Location`, `Modifiers`, `PersonalityWeights`          |
//! | [`tables`]      | `BehaviorTables`, `GuardConfig`, `ResolverConfig`, `EngineConfig` |
//! | [`probability`] | `ProbabilityModel` — base travel and activity probabilities       |
//! | [`gate`]        | `TravelGate` (plan state, stage 1), `select_activity` (stage 2)   |
//! | [`resolver`]    | `DestinationResolver` — activity → AOI                            |
//! | [`guard`]       | `DuplicateGuard`, `Cooldowns`, `RecentDestinations`               |
//! | [`classifier`]  | `ModeClassifier` — weather → `Phase` with hourly hysteresis       |
//! | [`capability`]  | `TimeSource`, `PositionSource`, `WeatherSource`, `MovementActuator` |
//! | [`loader`]      | `load_profiles_csv`, `AgentSetup`                                 |
//! | [`error`]       | `BehaviorError`, `BehaviorResult<T>`                              |
//!
//! # Decision pipeline
//!
//! One decision runs per idle agent per tick:
//!
//! 1. **Stage 1**: `base_travel_prob × propensity` admits or rejects travel.
//! 2. **Stage 2**: the slot's activities are scored and one is sampled.
//! 3. **Resolve**: the activity is mapped to a destination AOI.
//! 4. **Guard**: the destination is checked for duplicate trips.
//!
//! Any stage may end the tick in "stay".  The components here own no
//! environment access; `hm-sim` wires them to the capability traits.

pub mod capability;
pub mod classifier;
pub mod error;
pub mod gate;
pub mod guard;
pub mod loader;
pub mod probability;
pub mod profile;
pub mod resolver;
pub mod tables;


pub use capability::{Environment, MovementActuator, PoiIndex, PositionSource, TextCompletionService, TimeSource, WeatherSource};
pub use classifier::{ModeClassifier, PhaseChange};
pub use error::{BehaviorError, BehaviorResult};
pub use gate::{Commitment, TravelGate, select_activity};
pub use guard::{Cooldowns, DuplicateGuard, GuardRejection, RecentDestinations};
pub use loader::{AgentSetup, load_profiles_csv, load_profiles_reader};
pub use probability::{MAX_ACTIVITY_PROB, MAX_TRAVEL_PROB, ProbabilityModel, location_factor};
pub use profile::{Education, Gender, Location, Modifiers, PersonalityWeights, Profile};
pub use resolver::{DestinationResolver, ResolveContext};
pub use tables::{BehaviorTables, ClassifierConfig, EngineConfig, GuardConfig, ResolverConfig, SlotTable};
