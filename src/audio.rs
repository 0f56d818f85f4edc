/// The audio collaborator the core drives. The chase and vulnerable sirens
/// are looping background tracks; waka is a continuous eat loop that plays
/// while the player moves over pellet tiles.
///
/// Implementations are best-effort: a backend that fails to load its assets
/// should degrade to silence, never abort the simulation.
pub trait AudioSink {
    fn play_chase(&mut self);
    fn play_vulnerable(&mut self);
    fn play_waka(&mut self);
    fn stop_waka(&mut self);
    fn stop_music(&mut self);
}

/// Inert placeholder sink used by the terminal build and whenever a real
/// backend is unavailable.
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_chase(&mut self) {}
    fn play_vulnerable(&mut self) {}
    fn play_waka(&mut self) {}
    fn stop_waka(&mut self) {}
    fn stop_music(&mut self) {}
}

#[cfg(test)]
pub(crate) struct RecordingAudio {
    pub cues: Vec<&'static str>,
}

#[cfg(test)]
impl RecordingAudio {
    pub fn new() -> Self {
        Self { cues: Vec::new() }
    }

    pub fn last(&self) -> Option<&&'static str> {
        self.cues.last()
    }
}

#[cfg(test)]
impl AudioSink for RecordingAudio {
    fn play_chase(&mut self) {
        self.cues.push("chase");
    }
    fn play_vulnerable(&mut self) {
        self.cues.push("vulnerable");
    }
    fn play_waka(&mut self) {
        self.cues.push("waka_on");
    }
    fn stop_waka(&mut self) {
        self.cues.push("waka_off");
    }
    fn stop_music(&mut self) {
        self.cues.push("music_off");
    }
}
