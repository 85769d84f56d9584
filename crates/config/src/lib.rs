//! Site configuration for marquee: the named timing options plus the
//! overlays, carousels and forms the host page declares.

mod defaults;
mod error;
mod loader;
mod types;
mod validate;

#[cfg(test)]
mod test_parse;

pub use error::{Error, excerpt_at};
pub use loader::{Format, load_from_path, load_from_str};
pub use types::{
    CarouselSpec, Config, EnrollmentSpec, FieldSpec, FormSpec, HeroSpec, Options, OverlaySpec,
    PopupSpec, SlideSpec, slide_set_for,
};
