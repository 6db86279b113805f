// SPDX-License-Identifier: MPL-2.0
//! Colour stop lists for linear and radial gradients.
//!
//! [`ColorStops`] keeps two invariants:
//! - positions are sorted ascending after every mutation
//! - there are always at least two stops

use crate::domain::editing::StopPosition;
use crate::error::{Error, Result};
use crate::render::color::RgbaColor;
use tiny_skia::{GradientStop, LinearGradient, Point, RadialGradient, Shader, SpreadMode, Transform};

/// Minimum number of stops a gradient keeps.
pub const MIN_STOPS: usize = 2;

/// One colour at a position along the gradient (0–100).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub color: RgbaColor,
    pub position: StopPosition,
}

impl ColorStop {
    #[must_use]
    pub fn new(color: RgbaColor, position: f32) -> Self {
        Self {
            color,
            position: StopPosition::new(position),
        }
    }
}

/// An ordered, non-empty set of colour stops.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStops {
    stops: Vec<ColorStop>,
}

impl ColorStops {
    /// Builds a stop list, sorting by position.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] with fewer than two stops.
    pub fn new(stops: Vec<ColorStop>) -> Result<Self> {
        if stops.len() < MIN_STOPS {
            return Err(Error::InvalidParameter(format!(
                "a gradient needs at least {MIN_STOPS} colour stops"
            )));
        }
        let mut list = Self { stops };
        list.sort();
        Ok(list)
    }

    /// `from` at 0 and `to` at 100.
    #[must_use]
    pub fn two(from: RgbaColor, to: RgbaColor) -> Self {
        Self {
            stops: vec![ColorStop::new(from, 0.0), ColorStop::new(to, 100.0)],
        }
    }

    /// Inserts a stop and returns its index after re-sorting.
    pub fn insert(&mut self, stop: ColorStop) -> usize {
        self.stops.push(stop);
        let last = self.stops.len() - 1;
        self.sort_tracking(last)
    }

    /// Appends `color` at position 100, the default for a newly added stop.
    pub fn push_end(&mut self, color: RgbaColor) -> usize {
        self.insert(ColorStop::new(color, 100.0))
    }

    /// Removes the stop at `index`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if only two stops remain or `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Result<ColorStop> {
        if self.stops.len() <= MIN_STOPS {
            return Err(Error::InvalidParameter(format!(
                "cannot remove a stop: a gradient keeps at least {MIN_STOPS}"
            )));
        }
        if index >= self.stops.len() {
            return Err(out_of_range(index));
        }
        Ok(self.stops.remove(index))
    }

    /// Moves a stop and returns its index after re-sorting.
    pub fn set_position(&mut self, index: usize, position: f32) -> Result<usize> {
        let stop = self.stops.get_mut(index).ok_or_else(|| out_of_range(index))?;
        stop.position = StopPosition::new(position);
        Ok(self.sort_tracking(index))
    }

    pub fn set_color(&mut self, index: usize, color: RgbaColor) -> Result<()> {
        let stop = self.stops.get_mut(index).ok_or_else(|| out_of_range(index))?;
        stop.color = color;
        Ok(())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorStop> {
        self.stops.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Linear shader from `start` to `end`, both in the space of `transform`.
    #[must_use]
    pub fn linear_shader(&self, start: Point, end: Point, transform: Transform) -> Option<Shader<'static>> {
        LinearGradient::new(start, end, self.skia_stops(), SpreadMode::Pad, transform)
    }

    /// Radial shader centred on `center`.
    #[must_use]
    pub fn radial_shader(&self, center: Point, radius: f32, transform: Transform) -> Option<Shader<'static>> {
        RadialGradient::new(center, center, radius, self.skia_stops(), SpreadMode::Pad, transform)
    }

    /// CSS colour-stop list, e.g. `#3b82f6 0%, #ec4899 100%`.
    #[must_use]
    pub fn css_stops(&self) -> String {
        self.stops
            .iter()
            .map(|s| format!("{} {}%", s.color, s.position.value()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn skia_stops(&self) -> Vec<GradientStop> {
        self.stops
            .iter()
            .map(|s| GradientStop::new(s.position.as_offset(), s.color.to_skia()))
            .collect()
    }

    fn sort(&mut self) {
        self.stops
            .sort_by(|a, b| a.position.value().total_cmp(&b.position.value()));
    }

    /// Stable sort that reports where the element at `index` ended up.
    fn sort_tracking(&mut self, index: usize) -> usize {
        let mut tagged: Vec<(usize, ColorStop)> = self.stops.drain(..).enumerate().collect();
        tagged.sort_by(|(_, a), (_, b)| a.position.value().total_cmp(&b.position.value()));
        let new_index = tagged.iter().position(|(i, _)| *i == index).unwrap_or(index);
        self.stops = tagged.into_iter().map(|(_, s)| s).collect();
        new_index
    }
}

impl Default for ColorStops {
    fn default() -> Self {
        Self::two(RgbaColor::rgb(0x3B, 0x82, 0xF6), RgbaColor::rgb(0xEC, 0x48, 0x99))
    }
}

fn out_of_range(index: usize) -> Error {
    Error::InvalidParameter(format!("no colour stop at index {index}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: RgbaColor = RgbaColor::rgb(255, 0, 0);
    const GREEN: RgbaColor = RgbaColor::rgb(0, 255, 0);
    const BLUE: RgbaColor = RgbaColor::rgb(0, 0, 255);

    fn positions(stops: &ColorStops) -> Vec<f32> {
        stops.iter().map(|s| s.position.value()).collect()
    }

    #[test]
    fn new_sorts_and_requires_two() {
        let stops = ColorStops::new(vec![ColorStop::new(BLUE, 80.0), ColorStop::new(RED, 10.0)])
            .unwrap();
        assert_eq!(positions(&stops), vec![10.0, 80.0]);
        assert!(ColorStops::new(vec![ColorStop::new(RED, 0.0)]).is_err());
    }

    #[test]
    fn insert_keeps_positions_non_decreasing() {
        let mut stops = ColorStops::two(RED, BLUE);
        let idx = stops.insert(ColorStop::new(GREEN, 40.0));
        assert_eq!(idx, 1);
        assert_eq!(positions(&stops), vec![0.0, 40.0, 100.0]);
    }

    #[test]
    fn push_end_lands_after_existing_hundred() {
        let mut stops = ColorStops::two(RED, BLUE);
        let idx = stops.push_end(GREEN);
        assert_eq!(idx, 2);
        assert_eq!(stops.as_slice()[2].color, GREEN);
    }

    #[test]
    fn set_position_resorts_and_tracks_index() {
        let mut stops = ColorStops::two(RED, BLUE);
        stops.insert(ColorStop::new(GREEN, 50.0));
        let idx = stops.set_position(0, 90.0).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(stops.as_slice()[1].color, RED);
        assert_eq!(positions(&stops), vec![50.0, 90.0, 100.0]);
    }

    #[test]
    fn removing_below_two_is_rejected() {
        let mut stops = ColorStops::two(RED, BLUE);
        assert!(stops.remove(0).is_err());
        assert_eq!(stops.len(), 2);

        stops.push_end(GREEN);
        assert_eq!(stops.remove(0).unwrap().color, RED);
        assert_eq!(stops.len(), 2);
    }

    #[test]
    fn css_stop_list() {
        let stops = ColorStops::default();
        assert_eq!(stops.css_stops(), "#3b82f6 0%, #ec4899 100%");
    }
}
