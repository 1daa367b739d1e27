use crate::engine::config::{PatternConfig, Step, MAX_STEPS};

fn clamp(value: i32, min: i32, max: i32) -> i32 {
    value.max(min).min(max)
}

/// Chained editing of a pattern's steps, for wiring up presets and demo
/// patterns without touching fields one by one. Every setter clamps to
/// the step's legal range; the pattern silently stops growing at 64.
pub struct PatternBuilder<'a> {
    config: &'a mut PatternConfig,
    editing: usize,
    edit_all: bool,
}

impl<'a> PatternBuilder<'a> {
    pub fn new(config: &'a mut PatternConfig) -> PatternBuilder<'a> {
        PatternBuilder {
            config: config,
            editing: 0,
            edit_all: false,
        }
    }

    /// Remove all steps; channel and division stay.
    pub fn clear(&mut self) -> &mut Self {
        self.config.length = 0;
        for step in self.config.steps.iter_mut() {
            *step = Step::default();
        }
        self.editing = 0;
        self.edit_all = false;
        self
    }

    /// Append one default step per index (1..=8, 0 for a rest).
    pub fn indices(&mut self, idxs: &[i32]) -> &mut Self {
        for &idx in idxs {
            if self.config.length >= MAX_STEPS {
                break;
            }
            let mut step = Step::default();
            step.note_index = clamp(idx, 0, 8) as u8;
            self.config.steps[self.config.length] = step;
            self.config.length += 1;
        }
        self.editing = self.config.length.saturating_sub(1);
        self
    }

    /// Edit the last step, appending one first when the pattern is empty.
    pub fn step(&mut self) -> &mut Self {
        self.ensure_slot();
        self.editing = self.config.length - 1;
        self
    }

    /// Append a fresh step and move editing to it.
    pub fn next(&mut self) -> &mut Self {
        self.ensure_slot();
        self
    }

    /// Apply following setters to every existing step, until `done`.
    pub fn each(&mut self) -> &mut Self {
        self.edit_all = true;
        self
    }

    pub fn done(&mut self) -> &mut Self {
        self.edit_all = false;
        self
    }

    pub fn idx(&mut self, value: i32) -> &mut Self {
        self.set(|step| step.note_index = clamp(value, 0, 8) as u8)
    }

    pub fn vel(&mut self, value: i32) -> &mut Self {
        self.set(|step| step.velocity = clamp(value, 1, 127) as u8)
    }

    pub fn gate(&mut self, value: i32) -> &mut Self {
        self.set(|step| step.gate_pct = clamp(value, 1, 200) as u8)
    }

    pub fn oct(&mut self, value: i32) -> &mut Self {
        self.set(|step| step.octave = clamp(value, -8, 8) as i8)
    }

    pub fn prob(&mut self, value: i32) -> &mut Self {
        self.set(|step| step.probability = clamp(value, 0, 100) as u8)
    }

    pub fn on(&mut self) -> &mut Self {
        self.set(|step| step.enabled = true)
    }

    pub fn off(&mut self) -> &mut Self {
        self.set(|step| step.enabled = false)
    }

    /// Duplicate the last step `n` more times.
    pub fn repeat(&mut self, n: usize) -> &mut Self {
        if self.config.length == 0 {
            return self;
        }
        let last = self.config.steps[self.config.length - 1];
        let mut left = n;
        while left > 0 && self.config.length < MAX_STEPS {
            self.config.steps[self.config.length] = last;
            self.config.length += 1;
            left -= 1;
        }
        self.editing = self.config.length - 1;
        self
    }

    fn ensure_slot(&mut self) {
        if self.config.length == 0 {
            self.config.steps[0] = Step::default();
            self.config.length = 1;
        } else if self.editing == self.config.length - 1 && self.config.length < MAX_STEPS {
            self.config.steps[self.config.length] = Step::default();
            self.config.length += 1;
        }
    }

    fn set<F>(&mut self, func: F) -> &mut Self
    where
        F: Fn(&mut Step),
    {
        if self.config.length == 0 {
            self.ensure_slot();
        }
        if self.edit_all {
            for i in 0..self.config.length {
                func(&mut self.config.steps[i]);
            }
        } else {
            func(&mut self.config.steps[self.editing]);
        }
        self
    }
}
