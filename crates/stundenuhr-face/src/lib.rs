//! Stundenuhr clock face.
//!
//! Turns a canvas size and a wall-clock time into an ordered [`FacePlan`],
//! then records that plan into an engine `DrawList`:
//!
//! ```rust,ignore
//! let layout = FaceLayout::new(side, origin)?;
//! let plan = plan_face(&layout, WallTime::from_time(&clock.now()), &Theme::default());
//! FacePainter::new(&mut draw_list, &fonts, font, scale).paint(&plan);
//! ```
//!
//! Planning is pure and GPU-free; only the painter touches engine types
//! beyond geometry and paint.

pub mod angle;
pub mod layout;
pub mod painter;
pub mod plan;
pub mod theme;
pub mod time;

pub use angle::{hand_angle_deg, marker_angle_deg};
pub use layout::FaceLayout;
pub use painter::{centered_text_origin, shadow_layers, FacePainter};
pub use plan::{plan_face, FacePlan, FacePrimitive};
pub use theme::{TextShadow, Theme};
pub use time::{Clock, FixedClock, SystemClock, WallTime, FACE_TIMEZONE};
