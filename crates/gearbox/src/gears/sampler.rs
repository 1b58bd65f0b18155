//! Periodic sampling into bounded histories.

use std::fmt;

use gearbox_core::FixedCapacityRing;

/// Where a sampler pulls its values from.
pub enum SampleSource {
    /// Push-only: values arrive through [`DataSampler::insert_sample`].
    None,
    /// Called with no arguments.
    Value(Box<dyn FnMut() -> f32>),
    /// Called with the seconds elapsed since the previous pull.
    Elapsed(Box<dyn FnMut(f32) -> f32>),
}

impl fmt::Debug for SampleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "None",
            Self::Value(_) => "Value(..)",
            Self::Elapsed(_) => "Elapsed(..)",
        })
    }
}

/// A named, fixed-length history of samples.
#[derive(Debug)]
pub struct DataSampler {
    name: String,
    history: FixedCapacityRing<f32>,
    source: SampleSource,
    sample_rate: u32,
    frames_since_sample: u32,
    seconds_since_sample: f32,
}

impl DataSampler {
    /// Creates a push-only sampler keeping `capacity` samples.
    #[must_use]
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            history: FixedCapacityRing::new(capacity),
            source: SampleSource::None,
            sample_rate: 0,
            frames_since_sample: 0,
            seconds_since_sample: 0.0,
        }
    }

    /// Pulls from `source` every `sample_rate` frames.
    #[must_use]
    pub fn with_source(mut self, sample_rate: u32, source: impl FnMut() -> f32 + 'static) -> Self {
        self.source = SampleSource::Value(Box::new(source));
        self.sample_rate = sample_rate;
        self
    }

    /// Pulls from `source`, passing elapsed seconds, every `sample_rate` frames.
    #[must_use]
    pub fn with_elapsed_source(mut self, sample_rate: u32, source: impl FnMut(f32) -> f32 + 'static) -> Self {
        self.source = SampleSource::Elapsed(Box::new(source));
        self.sample_rate = sample_rate;
        self
    }

    /// Sampler name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sample history, oldest first.
    #[must_use]
    pub const fn history(&self) -> &FixedCapacityRing<f32> {
        &self.history
    }

    /// Frames between pulls, 0 when pulling is off.
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Changes the pull period. 0 stops pulling.
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
        self.frames_since_sample = 0;
    }

    /// History length.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.history.capacity()
    }

    /// Changes the history length, keeping the newest samples.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.history.set_capacity(capacity);
    }

    /// Forgets every sample.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Pushes a value, dropping the oldest when full.
    pub fn insert_sample(&mut self, value: f32) {
        self.history.push(value);
    }

    /// Advances one frame, pulling a sample when the period is up.
    pub fn update(&mut self, dt: f32) {
        self.seconds_since_sample += dt;
        if self.sample_rate == 0 {
            return;
        }
        self.frames_since_sample += 1;
        if self.frames_since_sample < self.sample_rate {
            return;
        }
        self.frames_since_sample = 0;
        let elapsed = std::mem::take(&mut self.seconds_since_sample);

        let value = match &mut self.source {
            SampleSource::None => return,
            SampleSource::Value(pull) => pull(),
            SampleSource::Elapsed(pull) => pull(elapsed),
        };
        self.history.push(value);
    }
}

/// All samplers, by name.
#[derive(Debug, Default)]
pub struct DataSamplerManager {
    samplers: Vec<DataSampler>,
}

impl DataSamplerManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a sampler. A sampler with the same name is replaced.
    pub fn add(&mut self, sampler: DataSampler) {
        match self.samplers.iter_mut().find(|s| s.name == sampler.name) {
            Some(existing) => *existing = sampler,
            None => self.samplers.push(sampler),
        }
    }

    /// Looks up a sampler.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DataSampler> {
        self.samplers.iter().find(|s| s.name == name)
    }

    /// Looks up a sampler mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut DataSampler> {
        self.samplers.iter_mut().find(|s| s.name == name)
    }

    /// Returns the sampler named `name`, creating a push-only one if needed.
    pub fn get_or_create(&mut self, name: &str, capacity: usize) -> &mut DataSampler {
        let index = match self.samplers.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.samplers.push(DataSampler::new(name, capacity));
                self.samplers.len() - 1
            }
        };
        &mut self.samplers[index]
    }

    /// Pushes a value into a sampler, creating it if needed.
    pub fn add_sample(&mut self, name: &str, value: f32, capacity: usize) {
        self.get_or_create(name, capacity).insert_sample(value);
    }

    /// Unregisters a sampler.
    pub fn remove(&mut self, name: &str) -> Option<DataSampler> {
        let index = self.samplers.iter().position(|s| s.name == name)?;
        Some(self.samplers.remove(index))
    }

    /// Advances every sampler one frame.
    pub fn update(&mut self, dt: f32) {
        for sampler in &mut self.samplers {
            sampler.update(dt);
        }
    }

    /// Forgets every sampler's history.
    pub fn clear_histories(&mut self) {
        for sampler in &mut self.samplers {
            sampler.clear_history();
        }
    }

    /// Sampler names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.samplers.iter().map(DataSampler::name)
    }

    /// Number of samplers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samplers.len()
    }

    /// True if there are no samplers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samplers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulls_every_nth_frame() {
        let mut counter = 0.0;
        let mut sampler = DataSampler::new("count", 8).with_source(3, move || {
            counter += 1.0;
            counter
        });

        for _ in 0..7 {
            sampler.update(0.1);
        }
        assert_eq!(sampler.history().iter().copied().collect::<Vec<_>>(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_rate_zero_disables_pulling() {
        let mut sampler = DataSampler::new("off", 4).with_source(0, || 1.0);
        sampler.update(0.1);
        assert!(sampler.history().is_empty());
    }

    #[test]
    fn test_elapsed_source_gets_time_since_last_pull() {
        let mut sampler = DataSampler::new("dt", 4).with_elapsed_source(2, |elapsed| elapsed);
        sampler.update(0.25);
        sampler.update(0.25);
        assert_eq!(sampler.history().last(), Some(&0.5));
    }

    #[test]
    fn test_history_drops_oldest_and_resizes() {
        let mut sampler = DataSampler::new("push", 3);
        for v in 1..=5 {
            sampler.insert_sample(v as f32);
        }
        assert_eq!(sampler.history().iter().copied().collect::<Vec<_>>(), vec![3.0, 4.0, 5.0]);

        sampler.set_capacity(2);
        assert_eq!(sampler.history().iter().copied().collect::<Vec<_>>(), vec![4.0, 5.0]);
    }

    #[test]
    fn test_manager_creates_on_first_sample() {
        let mut manager = DataSamplerManager::new();
        manager.add_sample("fps", 60.0, 10);
        manager.add_sample("fps", 59.0, 10);

        assert_eq!(manager.len(), 1);
        assert_eq!(manager.get("fps").unwrap().history().len(), 2);
        assert!(manager.remove("fps").is_some());
        assert!(manager.is_empty());
    }
}
