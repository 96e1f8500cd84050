//! Stat counters: `<span data-count="4.5" data-sufijo="%">` counts up from
//! zero the first time it scrolls into view.

use std::cell::RefCell;
use std::rc::Rc;

use regex::Regex;
use web_sys::Element;

use crate::config::CounterConfig;
use crate::error::EnhanceError;
use crate::utils::dom;
use crate::utils::viewport::{self, ViewportOptions, ViewportSupport};

pub const COUNT_ATTR: &str = "data-count";
pub const SUFFIX_ATTR: &str = "data-sufijo";

/// Leading number of `raw`, ignoring anything after it: `"120px"` is 120.
fn leading_number(raw: &str) -> Option<f64> {
    let re = Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").ok()?;
    let value: f64 = re.captures(raw)?.get(1)?.as_str().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Formats with one decimal the way JavaScript's `toFixed(1)` does: an exact
/// tie rounds away from zero instead of to the even digit.
fn to_fixed_1(value: f64) -> String {
    // Only quarters (x.25, x.75) are exact ties at one decimal.
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return format!("{:.1}", (value * 10.0).round() / 10.0);
    }
    format!("{:.1}", value)
}

/// Quadratic ease-out over `t` in `[0, 1]`.
pub fn ease_out_quad(t: f64) -> f64 {
    1.0 - (1.0 - t) * (1.0 - t)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CounterTarget {
    pub value: f64,
    pub decimal: bool,
    pub suffix: String,
}

impl CounterTarget {
    /// Returns `None` when `raw` does not start with a number.
    pub fn parse(raw: &str, suffix: Option<String>) -> Option<Self> {
        let value = leading_number(raw)?;
        Some(Self {
            value,
            decimal: raw.contains('.'),
            suffix: suffix.unwrap_or_default(),
        })
    }

    pub fn from_element(el: &Element) -> Option<Self> {
        let raw = el.get_attribute(COUNT_ATTR)?;
        Self::parse(&raw, el.get_attribute(SUFFIX_ATTR))
    }

    /// Text shown at an eased fraction of the way from zero.
    pub fn frame_text(&self, eased: f64) -> String {
        let value = self.value * eased;
        if self.decimal {
            format!("{}{}", to_fixed_1(value), self.suffix)
        } else {
            format!("{}{}", value.floor() as i64, self.suffix)
        }
    }

    /// The exact target, with no easing drift.
    pub fn final_text(&self) -> String {
        format!("{}{}", self.value, self.suffix)
    }
}

#[derive(Debug, Clone)]
pub struct CounterRun {
    target: CounterTarget,
    duration_ms: f64,
    started_at: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub text: String,
    pub done: bool,
}

impl CounterRun {
    pub fn new(target: CounterTarget, duration_ms: f64) -> Self {
        Self {
            target,
            duration_ms,
            started_at: None,
        }
    }

    /// Advances to the frame at `now`. The first call fixes the start time.
    pub fn tick(&mut self, now: f64) -> Frame {
        let start = *self.started_at.get_or_insert(now);
        let progress = if self.duration_ms > 0.0 {
            ((now - start) / self.duration_ms).min(1.0)
        } else {
            1.0
        };
        if progress >= 1.0 {
            return Frame {
                text: self.target.final_text(),
                done: true,
            };
        }
        Frame {
            text: self.target.frame_text(ease_out_quad(progress)),
            done: false,
        }
    }
}

fn animate(window: &web_sys::Window, el: Element, target: CounterTarget, duration_ms: f64) {
    let run = Rc::new(RefCell::new(CounterRun::new(target, duration_ms)));
    let result = dom::animation_loop(window, move |now| {
        let frame = run.borrow_mut().tick(now);
        el.set_text_content(Some(&frame.text));
        !frame.done
    });
    if let Err(e) = result {
        log::warn!("Failed to start counter animation: {}", e);
    }
}

pub fn init(config: &CounterConfig) -> Result<(), EnhanceError> {
    let window = dom::window()?;
    let document = dom::document()?;
    let counters = dom::query_all(&document, &format!("[{}]", COUNT_ATTR))?;
    if counters.is_empty() {
        return Err(EnhanceError::missing(&format!("[{}]", COUNT_ATTR)));
    }

    let duration_ms = config.duration_ms;
    let options = ViewportOptions {
        threshold: config.threshold,
        root_margin: None,
    };
    let support = ViewportSupport::detect(&window);
    let win = window.clone();
    viewport::on_first_visible(&window, counters, &options, move |el| {
        let Some(target) = CounterTarget::from_element(el) else {
            log::warn!(
                "Counter value {:?} is not a number, leaving it as is",
                el.get_attribute(COUNT_ATTR)
            );
            return;
        };
        match support {
            ViewportSupport::Observer => animate(&win, el.clone(), target, duration_ms),
            ViewportSupport::Unavailable => el.set_text_content(Some(&target.final_text())),
        }
    })?;
    log::info!("Animated counters ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(target: CounterTarget) -> Vec<Frame> {
        let mut run = CounterRun::new(target, 1400.0);
        let mut frames = Vec::new();
        let mut now = 1000.0;
        loop {
            let frame = run.tick(now);
            let done = frame.done;
            frames.push(frame);
            if done {
                return frames;
            }
            now += 16.7;
        }
    }

    #[test]
    fn easing_endpoints() {
        assert_eq!(ease_out_quad(0.0), 0.0);
        assert_eq!(ease_out_quad(1.0), 1.0);
        assert_eq!(ease_out_quad(0.5), 0.75);
    }

    #[test]
    fn decimal_target_with_suffix_ends_exact() {
        let target = CounterTarget::parse("4.5", Some("%".to_string())).unwrap();
        assert!(target.decimal);
        let frames = run_to_end(target);
        assert_eq!(frames.last().unwrap().text, "4.5%");
        assert_eq!(frames[0].text, "0.0%");
    }

    #[test]
    fn integer_target_without_suffix_ends_exact() {
        let target = CounterTarget::parse("120", None).unwrap();
        assert!(!target.decimal);
        let frames = run_to_end(target);
        assert_eq!(frames.last().unwrap().text, "120");
        assert!(frames[..frames.len() - 1].iter().all(|f| !f.done));
    }

    #[test]
    fn integer_frames_are_floored_and_monotonic() {
        let target = CounterTarget::parse("120", Some("+".to_string())).unwrap();
        let values: Vec<i64> = run_to_end(target)
            .iter()
            .map(|f| f.text.trim_end_matches('+').parse().unwrap())
            .collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*values.last().unwrap(), 120);
    }

    #[test]
    fn halfway_frame_is_eased() {
        let target = CounterTarget::parse("100", None).unwrap();
        let mut run = CounterRun::new(target, 1400.0);
        run.tick(0.0);
        assert_eq!(run.tick(700.0).text, "75");
    }

    #[test]
    fn late_frame_snaps_to_target() {
        let target = CounterTarget::parse("2.0", Some("k".to_string())).unwrap();
        let mut run = CounterRun::new(target, 1400.0);
        run.tick(0.0);
        let frame = run.tick(5000.0);
        assert!(frame.done);
        assert_eq!(frame.text, "2k");
    }

    #[test]
    fn rejects_non_numbers() {
        assert!(CounterTarget::parse("many", None).is_none());
        assert!(CounterTarget::parse("", None).is_none());
        assert!(CounterTarget::parse("inf", None).is_none());
        assert!(CounterTarget::parse("px120", None).is_none());
    }

    #[test]
    fn reads_leading_number_and_ignores_trailing_text() {
        let target = CounterTarget::parse("120px", None).unwrap();
        assert_eq!(target.value, 120.0);
        assert!(!target.decimal);
        assert_eq!(target.final_text(), "120");

        let target = CounterTarget::parse(" 4.50%", Some("%".to_string())).unwrap();
        assert!(target.decimal);
        assert_eq!(target.final_text(), "4.5%");

        assert_eq!(CounterTarget::parse(".5", None).unwrap().value, 0.5);
        assert_eq!(CounterTarget::parse("-3e2 pts", None).unwrap().value, -300.0);
    }

    #[test]
    fn decimal_ties_round_away_from_zero() {
        let target = CounterTarget::parse("1.0", None).unwrap();
        assert_eq!(target.frame_text(0.25), "0.3");
        assert_eq!(target.frame_text(0.75), "0.8");
        assert_eq!(target.frame_text(0.5), "0.5");
        // 0.35 is stored just below the tie, so it rounds down.
        assert_eq!(target.frame_text(0.35), "0.3");

        let negative = CounterTarget::parse("-1.0", None).unwrap();
        assert_eq!(negative.frame_text(0.25), "-0.3");

        let larger = CounterTarget::parse("9.0", Some("%".to_string())).unwrap();
        assert_eq!(larger.frame_text(0.25), "2.3%");
    }
}
