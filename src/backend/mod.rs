// TODO: native PipeWire backend on top of the pipewire crate, without spawning pw-link

pub mod pipewire;
pub use self::pipewire::PwLink;

#[cfg(all(target_os = "linux", feature = "alsa-seq"))]
pub mod alsa;
#[cfg(all(target_os = "linux", feature = "alsa-seq"))]
pub use self::alsa::AlsaSeq;
