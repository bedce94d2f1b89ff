//! Audio system driven by simulation events
//!
//! Playback runs on a worker thread fed through a channel, so a slow or
//! failing sound device never stalls a tick. Backend errors are logged on
//! the worker and go no further.

use std::io::Write;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use thiserror::Error;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// New session begins
    Startup,
    /// Player fires a shot
    PlayerLaser,
    /// Enemy drops a bomb
    AlienLaser,
    /// Enemy or player destroyed
    Explosion,
    /// Session over
    GameOver,
}

impl SoundEffect {
    /// The effect a simulation event should trigger, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ShotFired { .. } => Some(SoundEffect::PlayerLaser),
            GameEvent::BombFired { .. } => Some(SoundEffect::AlienLaser),
            GameEvent::EnemyDestroyed { .. } | GameEvent::PlayerHit { .. } => {
                Some(SoundEffect::Explosion)
            }
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::WaveCleared { .. } => None,
        }
    }

    /// Asset name a sample-based backend would load
    pub fn asset_name(self) -> &'static str {
        match self {
            SoundEffect::Startup => "startup.wav",
            SoundEffect::PlayerLaser => "playerlaser.wav",
            SoundEffect::AlienLaser => "alienlaser.wav",
            SoundEffect::Explosion => "explosion.wav",
            SoundEffect::GameOver => "gameover.wav",
        }
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("audio device unavailable: {0}")]
    Unavailable(String),
}

/// Something that can actually make a sound
pub trait SoundBackend: Send + 'static {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
}

/// Rings the terminal bell for the loud effects
#[derive(Debug, Default)]
pub struct TerminalBell;

impl SoundBackend for TerminalBell {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
        // Lasers would ring every few ticks
        if matches!(effect, SoundEffect::PlayerLaser | SoundEffect::AlienLaser) || volume < 0.5 {
            return Ok(());
        }
        let mut err = std::io::stderr();
        err.write_all(b"\x07")?;
        err.flush()?;
        Ok(())
    }
}

/// Swallows every effect
#[derive(Debug, Default)]
pub struct Silent;

impl SoundBackend for Silent {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager {
    tx: Option<Sender<(SoundEffect, f32)>>,
    worker: Option<JoinHandle<()>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioManager {
    /// Start a worker thread playing through `backend`
    pub fn new<B: SoundBackend>(mut backend: B) -> Self {
        let (tx, rx) = mpsc::channel::<(SoundEffect, f32)>();
        let worker = thread::Builder::new()
            .name("audio".into())
            .spawn(move || {
                for (effect, volume) in rx {
                    if let Err(e) = backend.play(effect, volume) {
                        log::warn!("Failed to play {}: {}", effect.asset_name(), e);
                    }
                }
            });

        let (tx, worker) = match worker {
            Ok(handle) => (Some(tx), Some(handle)),
            Err(e) => {
                log::warn!("Failed to start audio thread - audio disabled: {}", e);
                (None, None)
            }
        };

        Self {
            tx,
            worker,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// A manager that never plays anything
    pub fn disabled() -> Self {
        Self {
            tx: None,
            worker: None,
            master_volume: 0.0,
            sfx_volume: 0.0,
            muted: true,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Queue a sound effect; never blocks
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(tx) = &self.tx else { return };
        if tx.send((effect, vol)).is_err() {
            log::warn!("Audio thread gone, dropping {}", effect.asset_name());
        }
    }

    /// Play whatever a tick's events call for
    pub fn react(&self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }
}

impl Drop for AudioManager {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use glam::IVec2;

    use super::*;
    use crate::sim::DefeatCause;

    /// Records what would have been played
    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<(SoundEffect, f32)>>>);

    impl SoundBackend for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
            self.0.lock().unwrap().push((effect, volume));
            Ok(())
        }
    }

    struct Broken;

    impl SoundBackend for Broken {
        fn play(&mut self, _effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
            Err(AudioError::Unavailable("no device".into()))
        }
    }

    #[test]
    fn test_event_mapping() {
        let pos = IVec2::ZERO;
        assert_eq!(
            SoundEffect::for_event(&GameEvent::ShotFired { pos }),
            Some(SoundEffect::PlayerLaser)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::BombFired { enemy: 3, pos }),
            Some(SoundEffect::AlienLaser)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PlayerHit { pos }),
            Some(SoundEffect::Explosion)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::GameOver {
                cause: DefeatCause::Invaded,
                score: 4
            }),
            Some(SoundEffect::GameOver)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::WaveCleared {
                wave: 1,
                tick_interval_ms: 16
            }),
            None
        );
    }

    #[test]
    fn test_react_plays_in_order() {
        let recorder = Recorder::default();
        let played = recorder.0.clone();
        let audio = AudioManager::new(recorder);
        audio.react(&[
            GameEvent::ShotFired { pos: IVec2::ZERO },
            GameEvent::EnemyDestroyed {
                index: 0,
                pos: IVec2::ZERO,
            },
        ]);
        drop(audio);

        let played = played.lock().unwrap();
        let effects: Vec<SoundEffect> = played.iter().map(|(e, _)| *e).collect();
        assert_eq!(effects, vec![SoundEffect::PlayerLaser, SoundEffect::Explosion]);
        assert!((played[0].1 - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let recorder = Recorder::default();
        let played = recorder.0.clone();
        let mut audio = AudioManager::new(recorder);
        audio.set_muted(true);
        assert_eq!(audio.effective_volume(), 0.0);
        audio.play(SoundEffect::Explosion);
        drop(audio);
        assert!(played.lock().unwrap().is_empty());
    }

    #[test]
    fn test_backend_errors_stay_on_worker() {
        let audio = AudioManager::new(Broken);
        audio.play(SoundEffect::Startup);
        audio.play(SoundEffect::GameOver);
        drop(audio);

        let disabled = AudioManager::disabled();
        disabled.play(SoundEffect::Explosion);
    }

    #[test]
    fn test_volume_clamped() {
        let mut audio = AudioManager::disabled();
        audio.set_muted(false);
        audio.set_master_volume(2.0);
        audio.set_sfx_volume(0.5);
        assert!((audio.effective_volume() - 0.5).abs() < 1e-6);
    }
}
