//! typecase-test: Test domain for conformance testing
//!
//! Provides a small user-defined subject type ([`Event`]) with hand-written
//! discriminators. This is the reference extension that demonstrates how to
//! match on a domain enum instead of [`Value`].
//!
//! # Example
//!
//! ```
//! use typecase_test::prelude::*;
//!
//! let describe = |event: Event| {
//!     Matcher::new(event)
//!         .with_rule(when(KeyPress).guard(|k: &str| k == "q").yields("quit"))
//!         .with_rule(when(KeyPress).yields("key"))
//!         .with_rule(when(Click).yields("click"))
//!         .with_default(|| "ignored")
//!         .evaluate()
//! };
//!
//! assert_eq!(describe(Event::key("q")), Ok("quit"));
//! assert_eq!(describe(Event::click(3, 4)), Ok("click"));
//! assert_eq!(describe(Event::Scroll(1.5)), Ok("ignored"));
//! ```

use typecase::prelude::*;

#[cfg(feature = "fixtures")]
pub mod fixture;

/// A UI event: the test domain's subject type.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Mouse click at a position.
    Click(Point),
    /// Key press, by key name.
    Key(String),
    /// Scroll by a signed amount.
    Scroll(f64),
}

/// Screen position of a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Event {
    /// Click at `(x, y)`.
    #[must_use]
    pub fn click(x: i32, y: i32) -> Self {
        Self::Click(Point { x, y })
    }

    /// Key press.
    #[must_use]
    pub fn key(name: impl Into<String>) -> Self {
        Self::Key(name.into())
    }
}

/// Narrows an [`Event`] to the position of a click.
#[derive(Debug, Clone, Copy, Default)]
pub struct Click;

impl Discriminator<Event> for Click {
    type Target = Point;

    fn narrow<'a>(&self, event: &'a Event) -> Option<&'a Point> {
        match event {
            Event::Click(point) => Some(point),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        "click"
    }
}

/// Narrows an [`Event`] to the name of a pressed key.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyPress;

impl Discriminator<Event> for KeyPress {
    type Target = str;

    fn narrow<'a>(&self, event: &'a Event) -> Option<&'a str> {
        match event {
            Event::Key(name) => Some(name.as_str()),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        "key"
    }
}

/// Narrows an [`Event`] to a scroll amount.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scroll;

impl Discriminator<Event> for Scroll {
    type Target = f64;

    fn narrow<'a>(&self, event: &'a Event) -> Option<&'a f64> {
        match event {
            Event::Scroll(amount) => Some(amount),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        "scroll"
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{Click, Event, KeyPress, Point, Scroll};
    pub use typecase::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> CaseTable<Event, String> {
        CaseTable::new()
            .with_rule(
                when(Click)
                    .guard(|p: &Point| p.x < 0 || p.y < 0)
                    .then(|_: &Point| "offscreen".to_string()),
            )
            .with_rule(when(Click).then(|p: &Point| format!("click {},{}", p.x, p.y)))
            .with_rule(when(KeyPress).then(|k: &str| format!("key {k}")))
            .with_rule(
                when(Scroll)
                    .guard(|d: &f64| *d < 0.0)
                    .then(|_: &f64| "up".to_string()),
            )
            .with_rule(when(Scroll).then(|_: &f64| "down".to_string()))
    }

    #[test]
    fn test_click_narrowing() {
        assert_eq!(Click.narrow(&Event::click(1, 2)), Some(&Point { x: 1, y: 2 }));
        assert_eq!(Click.narrow(&Event::key("a")), None);
    }

    #[test]
    fn test_key_narrowing() {
        assert_eq!(KeyPress.narrow(&Event::key("enter")), Some("enter"));
        assert_eq!(KeyPress.narrow(&Event::Scroll(1.0)), None);
    }

    #[test]
    fn test_dispatch_first_match_wins() {
        let table = dispatcher();

        assert_eq!(table.evaluate(&Event::click(-1, 5)), Ok("offscreen".into()));
        assert_eq!(table.evaluate(&Event::click(3, 4)), Ok("click 3,4".into()));
        assert_eq!(table.evaluate(&Event::key("esc")), Ok("key esc".into()));
        assert_eq!(table.evaluate(&Event::Scroll(-2.0)), Ok("up".into()));
        assert_eq!(table.evaluate(&Event::Scroll(2.0)), Ok("down".into()));
    }

    #[test]
    fn test_dispatch_trace_names() {
        let table = dispatcher();
        let trace = table.evaluate_with_trace(&Event::Scroll(1.0));

        let names: Vec<_> = trace.steps.iter().map(|s| s.rule).collect();
        assert_eq!(names, ["click", "click", "key", "scroll", "scroll"]);
        assert_eq!(trace.matched_index(), Some(4));
    }

    #[test]
    fn test_unhandled_event_is_no_match() {
        let table: CaseTable<Event, &str> = CaseTable::new().with_rule(when(Click).yields("click"));

        assert_eq!(
            table.evaluate(&Event::key("a")),
            Err(MatchError::NoMatch { rules: 1 })
        );
    }
}
