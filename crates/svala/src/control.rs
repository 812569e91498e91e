//! Control state — named flags and scalar parameters.
//!
//! [`ControlState`] is the single place where external events become state
//! the animation behaviors can see: the input router (and host update hooks)
//! write it, behaviors read it through a shared reference. Behaviors never
//! mutate it, so a frame observes one consistent snapshot.

use std::collections::HashMap;

/// Named boolean flags plus named scalar parameters.
///
/// Flags read as `false` and scalars as their caller-supplied default until
/// something writes them, so behaviors don't need registration up front.
#[derive(Debug, Default)]
pub struct ControlState {
    flags: HashMap<String, bool>,
    scalars: HashMap<String, f32>,
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a flag. Unset flags read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Set a flag.
    pub fn set_flag(&mut self, name: &str, value: bool) {
        self.flags.insert(name.to_string(), value);
    }

    /// Flip a flag and return its new value. An unset flag toggles to `true`.
    pub fn toggle_flag(&mut self, name: &str) -> bool {
        let value = !self.flag(name);
        self.set_flag(name, value);
        value
    }

    /// Read a scalar, falling back to `default` when unset.
    pub fn scalar_or(&self, name: &str, default: f32) -> f32 {
        self.scalars.get(name).copied().unwrap_or(default)
    }

    /// Set a scalar.
    pub fn set_scalar(&mut self, name: &str, value: f32) {
        self.scalars.insert(name.to_string(), value);
    }

    /// Add `delta` to a scalar (treating an unset scalar as `default`) and
    /// return the new value.
    pub fn adjust_scalar(&mut self, name: &str, delta: f32, default: f32) -> f32 {
        let value = self.scalar_or(name, default) + delta;
        self.set_scalar(name, value);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_flag_reads_false() {
        let controls = ControlState::new();
        assert!(!controls.flag("go"));
    }

    #[test]
    fn set_and_read_flag() {
        let mut controls = ControlState::new();
        controls.set_flag("go", true);
        assert!(controls.flag("go"));
    }

    #[test]
    fn toggle_flag_flips() {
        let mut controls = ControlState::new();
        assert!(controls.toggle_flag("walls"));
        assert!(!controls.toggle_flag("walls"));
        assert!(!controls.flag("walls"));
    }

    #[test]
    fn scalar_falls_back_to_default() {
        let mut controls = ControlState::new();
        assert_eq!(controls.scalar_or("rotation_speed", 1.0), 1.0);
        controls.set_scalar("rotation_speed", 2.5);
        assert_eq!(controls.scalar_or("rotation_speed", 1.0), 2.5);
    }

    #[test]
    fn adjust_scalar_accumulates() {
        let mut controls = ControlState::new();
        assert_eq!(controls.adjust_scalar("rotation_speed", 0.5, 1.0), 1.5);
        assert_eq!(controls.adjust_scalar("rotation_speed", -1.0, 1.0), 0.5);
    }
}
