//! Music and sound commands
//!
//! The simulation never touches an audio device. Everything that wants
//! sound goes through a `Mixer`, which applies the mute/volume settings and
//! queues `AudioCommand`s for the frontend to execute after the tick.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::ms_to_frames;

/// Every piece of music the game can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Track {
    TitleTheme,
    UprisingTheme,
    TsarTheme,
    CommunistTheme,
    VictoryTheme,
    ShumiMaritsa,
    RepublicoNashaZdravei,
    ZemyaNaGeroi,
    MilaRodinoZhivkov,
    MilaRodino,
}

impl Track {
    pub const ALL: [Track; 10] = [
        Track::TitleTheme,
        Track::UprisingTheme,
        Track::TsarTheme,
        Track::CommunistTheme,
        Track::VictoryTheme,
        Track::ShumiMaritsa,
        Track::RepublicoNashaZdravei,
        Track::ZemyaNaGeroi,
        Track::MilaRodinoZhivkov,
        Track::MilaRodino,
    ];

    /// Base mix level before the player's music volume
    pub fn volume(self) -> f32 {
        match self {
            Track::CommunistTheme => 0.03,
            Track::TitleTheme
            | Track::UprisingTheme
            | Track::TsarTheme
            | Track::VictoryTheme => 0.05,
            _ => 0.1,
        }
    }

    /// Anthem tunes played from exhibit buttons
    pub fn is_anthem(self) -> bool {
        !matches!(
            self,
            Track::TitleTheme
                | Track::UprisingTheme
                | Track::TsarTheme
                | Track::CommunistTheme
                | Track::VictoryTheme
        )
    }

    /// Path of the audio file, relative to the page
    pub fn file(self) -> &'static str {
        match self {
            Track::TitleTheme => "assets/music/title_theme.mp3",
            Track::UprisingTheme => "assets/music/uprising_theme.mp3",
            Track::TsarTheme => "assets/music/tsar_theme.mp3",
            Track::CommunistTheme => "assets/music/communist_theme.mp3",
            Track::VictoryTheme => "assets/music/shumi_marica.mp3",
            Track::ShumiMaritsa => "assets/anthems/shumi_marica_ivan_vazov.mp3",
            Track::RepublicoNashaZdravei => "assets/anthems/republico_nasha_zdravei.mp3",
            Track::ZemyaNaGeroi => "assets/anthems/zemia_na_geroi.mp3",
            Track::MilaRodinoZhivkov => "assets/anthems/mila_rodino_zhivkov.mp3",
            Track::MilaRodino => "assets/anthems/mila_rodino.mp3",
        }
    }
}

/// Player audio preferences, passed to every sound-producing call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    pub muted: bool,
    /// Multiplier on every track volume (0.0 - 1.0)
    pub music_volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            muted: false,
            music_volume: 1.0,
        }
    }
}

/// Instructions for the audio backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCommand {
    Play {
        track: Track,
        looped: bool,
        volume: f32,
    },
    SetVolume {
        track: Track,
        volume: f32,
    },
    FadeOut {
        track: Track,
        ms: u32,
    },
    Stop {
        track: Track,
    },
    StopAll,
}

/// What the background music should do on a mode change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicCue {
    /// Leave whatever is playing alone
    Keep,
    /// Crossfade to this track
    Play(Track),
    /// Fade out to nothing
    Silence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MusicPhase {
    Idle,
    Playing,
    FadingOut { frames_left: u32 },
    Silent { frames_left: u32 },
    FadingIn { frame: u32 },
}

/// Background music state with a frame-counted crossfade
#[derive(Debug, Clone, PartialEq)]
pub struct Mixer {
    pub settings: AudioSettings,
    current: Option<Track>,
    next: Option<Track>,
    phase: MusicPhase,
    /// Background music paused while an anthem tune plays
    suspended: bool,
    tune: Option<Track>,
    commands: Vec<AudioCommand>,
}

impl Mixer {
    pub fn new(settings: AudioSettings) -> Self {
        Self {
            settings,
            current: None,
            next: None,
            phase: MusicPhase::Idle,
            suspended: false,
            tune: None,
            commands: Vec::new(),
        }
    }

    /// Queue a command unless mute forbids it (stopping is always allowed)
    fn emit(&mut self, command: AudioCommand) {
        let audible = matches!(
            command,
            AudioCommand::Play { .. } | AudioCommand::SetVolume { .. }
        );
        if audible && self.settings.muted {
            return;
        }
        self.commands.push(command);
    }

    fn mixed_volume(&self, track: Track) -> f32 {
        track.volume() * self.settings.music_volume.clamp(0.0, 1.0)
    }

    /// Track that the background music is on or heading to
    pub fn current_track(&self) -> Option<Track> {
        self.next.or(self.current)
    }

    /// Anthem tune currently sounding over the room
    pub fn tune(&self) -> Option<Track> {
        self.tune
    }

    pub fn is_fading(&self) -> bool {
        !matches!(self.phase, MusicPhase::Idle | MusicPhase::Playing)
    }

    /// Start a crossfade toward `cue`, fading the current track over `fade_ms`
    pub fn cue(&mut self, cue: MusicCue, fade_ms: u32) {
        let target = match cue {
            MusicCue::Keep => return,
            MusicCue::Play(track) => Some(track),
            MusicCue::Silence => None,
        };
        if self.current_track() == target && !matches!(self.phase, MusicPhase::Idle) {
            return;
        }

        self.next = target;
        match (self.current, self.phase) {
            (Some(track), MusicPhase::Playing | MusicPhase::FadingIn { .. }) => {
                self.emit(AudioCommand::FadeOut {
                    track,
                    ms: fade_ms,
                });
                self.phase = MusicPhase::FadingOut {
                    frames_left: ms_to_frames(fade_ms).max(1),
                };
            }
            (_, MusicPhase::FadingOut { .. }) => {}
            _ => {
                self.current = None;
                self.phase = if self.next.is_some() {
                    MusicPhase::Silent {
                        frames_left: MUSIC_SILENCE_FRAMES,
                    }
                } else {
                    MusicPhase::Idle
                };
            }
        }
    }

    /// Advance the crossfade by one frame
    pub fn advance(&mut self) {
        match self.phase {
            MusicPhase::Idle | MusicPhase::Playing => {}
            MusicPhase::FadingOut { frames_left } => {
                if frames_left > 1 {
                    self.phase = MusicPhase::FadingOut {
                        frames_left: frames_left - 1,
                    };
                    return;
                }
                if let Some(track) = self.current.take() {
                    self.emit(AudioCommand::Stop { track });
                }
                self.phase = if self.next.is_some() {
                    MusicPhase::Silent {
                        frames_left: MUSIC_SILENCE_FRAMES,
                    }
                } else {
                    MusicPhase::Idle
                };
            }
            MusicPhase::Silent { frames_left } => {
                if frames_left > 1 {
                    self.phase = MusicPhase::Silent {
                        frames_left: frames_left - 1,
                    };
                    return;
                }
                let Some(track) = self.next.take() else {
                    self.phase = MusicPhase::Idle;
                    return;
                };
                self.current = Some(track);
                self.phase = MusicPhase::FadingIn { frame: 0 };
                if !self.suspended {
                    self.emit(AudioCommand::Play {
                        track,
                        looped: true,
                        volume: 0.0,
                    });
                }
            }
            MusicPhase::FadingIn { frame } => {
                let Some(track) = self.current else {
                    self.phase = MusicPhase::Idle;
                    return;
                };
                let frame = frame + 1;
                let t = frame as f32 / MUSIC_FADE_IN_FRAMES as f32;
                if !self.suspended {
                    let volume = self.mixed_volume(track) * t.min(1.0);
                    self.emit(AudioCommand::SetVolume { track, volume });
                }
                self.phase = if frame >= MUSIC_FADE_IN_FRAMES {
                    MusicPhase::Playing
                } else {
                    MusicPhase::FadingIn { frame }
                };
            }
        }
    }

    /// Play a one-off tune over the room, pausing the background music.
    /// Returns false when muted and nothing started.
    pub fn play_tune(&mut self, track: Track) -> bool {
        if self.settings.muted {
            return false;
        }
        if let Some(current) = self.current
            && !self.suspended
        {
            self.commands.push(AudioCommand::Stop { track: current });
        }
        self.suspended = true;
        self.tune = Some(track);
        let volume = self.mixed_volume(track);
        self.emit(AudioCommand::Play {
            track,
            looped: true,
            volume,
        });
        true
    }

    /// Stop a tune and bring the background music back
    pub fn stop_tune(&mut self, track: Track) {
        self.commands.push(AudioCommand::Stop { track });
        if self.tune == Some(track) {
            self.tune = None;
        }
        if !self.suspended {
            return;
        }
        self.suspended = false;
        if let Some(current) = self.current {
            let volume = self.mixed_volume(current);
            self.emit(AudioCommand::Play {
                track: current,
                looped: true,
                volume,
            });
        }
    }

    /// Silence everything and forget the current music
    pub fn stop_all(&mut self) {
        self.commands.push(AudioCommand::StopAll);
        self.current = None;
        self.next = None;
        self.suspended = false;
        self.tune = None;
        self.phase = MusicPhase::Idle;
    }

    /// Flip mute. Muting stops all sound; unmuting restarts the background music.
    pub fn toggle_mute(&mut self) -> bool {
        self.settings.muted = !self.settings.muted;
        if self.settings.muted {
            self.commands.push(AudioCommand::StopAll);
            self.suspended = false;
            self.tune = None;
        } else if let Some(track) = self.current {
            if matches!(self.phase, MusicPhase::FadingIn { .. }) {
                self.phase = MusicPhase::Playing;
            }
            if !matches!(self.phase, MusicPhase::FadingOut { .. }) {
                let volume = self.mixed_volume(track);
                self.emit(AudioCommand::Play {
                    track,
                    looped: true,
                    volume,
                });
            }
        }
        self.settings.muted
    }

    /// Take the commands queued since the last drain
    pub fn drain(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn pending(&self) -> &[AudioCommand] {
        &self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(mixer: &mut Mixer, frames: u32) {
        for _ in 0..frames {
            mixer.advance();
        }
    }

    fn started(mixer: &mut Mixer, track: Track) {
        mixer.cue(MusicCue::Play(track), ROOM_MUSIC_FADE_MS);
        run(mixer, MUSIC_SILENCE_FRAMES + MUSIC_FADE_IN_FRAMES);
        mixer.drain();
    }

    #[test]
    fn test_first_track_fades_in() {
        let mut mixer = Mixer::new(AudioSettings::default());
        mixer.cue(MusicCue::Play(Track::TitleTheme), ROOM_MUSIC_FADE_MS);
        run(&mut mixer, MUSIC_SILENCE_FRAMES);
        assert_eq!(
            mixer.drain(),
            vec![AudioCommand::Play {
                track: Track::TitleTheme,
                looped: true,
                volume: 0.0
            }]
        );
        run(&mut mixer, MUSIC_FADE_IN_FRAMES);
        let last = mixer.drain().pop();
        assert_eq!(
            last,
            Some(AudioCommand::SetVolume {
                track: Track::TitleTheme,
                volume: 0.05
            })
        );
        assert!(!mixer.is_fading());
    }

    #[test]
    fn test_crossfade_stops_old_then_starts_new() {
        let mut mixer = Mixer::new(AudioSettings::default());
        started(&mut mixer, Track::TitleTheme);

        mixer.cue(MusicCue::Play(Track::TsarTheme), ROOM_MUSIC_FADE_MS);
        assert_eq!(
            mixer.drain(),
            vec![AudioCommand::FadeOut {
                track: Track::TitleTheme,
                ms: ROOM_MUSIC_FADE_MS
            }]
        );
        run(&mut mixer, ms_to_frames(ROOM_MUSIC_FADE_MS));
        assert_eq!(
            mixer.drain(),
            vec![AudioCommand::Stop {
                track: Track::TitleTheme
            }]
        );
        run(&mut mixer, MUSIC_SILENCE_FRAMES);
        assert!(matches!(
            mixer.drain().as_slice(),
            [AudioCommand::Play {
                track: Track::TsarTheme,
                ..
            }]
        ));
    }

    #[test]
    fn test_same_track_is_not_restarted() {
        let mut mixer = Mixer::new(AudioSettings::default());
        started(&mut mixer, Track::TitleTheme);
        mixer.cue(MusicCue::Play(Track::TitleTheme), ROOM_MUSIC_FADE_MS);
        mixer.cue(MusicCue::Keep, ROOM_MUSIC_FADE_MS);
        assert!(mixer.pending().is_empty());
        assert!(!mixer.is_fading());
    }

    #[test]
    fn test_muted_mixer_stays_silent() {
        let mut mixer = Mixer::new(AudioSettings {
            muted: true,
            music_volume: 1.0,
        });
        mixer.cue(MusicCue::Play(Track::UprisingTheme), ROOM_MUSIC_FADE_MS);
        run(&mut mixer, 200);
        assert!(!mixer.play_tune(Track::MilaRodino));
        assert!(mixer.pending().is_empty());
        assert_eq!(mixer.tune(), None);
        assert_eq!(mixer.current_track(), Some(Track::UprisingTheme));
    }

    #[test]
    fn test_unmute_restarts_current_track() {
        let mut mixer = Mixer::new(AudioSettings::default());
        started(&mut mixer, Track::UprisingTheme);
        assert!(mixer.toggle_mute());
        assert_eq!(mixer.drain(), vec![AudioCommand::StopAll]);
        assert!(!mixer.toggle_mute());
        assert!(matches!(
            mixer.drain().as_slice(),
            [AudioCommand::Play {
                track: Track::UprisingTheme,
                looped: true,
                ..
            }]
        ));
    }

    #[test]
    fn test_tune_suspends_and_restores_music() {
        let mut mixer = Mixer::new(AudioSettings::default());
        started(&mut mixer, Track::CommunistTheme);

        mixer.play_tune(Track::MilaRodino);
        assert_eq!(
            mixer.drain(),
            vec![
                AudioCommand::Stop {
                    track: Track::CommunistTheme
                },
                AudioCommand::Play {
                    track: Track::MilaRodino,
                    looped: true,
                    volume: 0.1
                },
            ]
        );

        mixer.stop_tune(Track::MilaRodino);
        assert_eq!(
            mixer.drain(),
            vec![
                AudioCommand::Stop {
                    track: Track::MilaRodino
                },
                AudioCommand::Play {
                    track: Track::CommunistTheme,
                    looped: true,
                    volume: 0.03
                },
            ]
        );
    }

    #[test]
    fn test_anthem_files_live_with_anthems() {
        for track in Track::ALL {
            assert_eq!(track.is_anthem(), track.file().starts_with("assets/anthems/"));
        }
    }

    #[test]
    fn test_silence_fades_to_idle() {
        let mut mixer = Mixer::new(AudioSettings::default());
        started(&mut mixer, Track::TitleTheme);
        mixer.cue(MusicCue::Silence, EXIT_MUSIC_FADE_MS);
        run(&mut mixer, ms_to_frames(EXIT_MUSIC_FADE_MS) + 5);
        assert_eq!(mixer.current_track(), None);
        assert!(!mixer.is_fading());
    }
}
