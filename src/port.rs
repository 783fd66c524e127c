use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    /// A sink: something can be connected *to* it.
    Input,
    /// A source.
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PortDirection::Input => "input".fmt(f),
            PortDirection::Output => "output".fmt(f),
        }
    }
}

/// The routing layer's identifier of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(pub u32);

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single audio or MIDI endpoint, identified by its name and the
/// device (node or application) that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    id: PortId,
    device: String,
    name: String,
    direction: PortDirection,
}

impl Port {
    pub fn new<D, N>(id: PortId, device: D, name: N, direction: PortDirection) -> Port
    where
        D: Into<String>,
        N: Into<String>,
    {
        Port {
            id,
            device: device.into(),
            name: name.into(),
            direction,
        }
    }

    pub fn id(&self) -> PortId {
        self.id
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> PortDirection {
        self.direction
    }

    /// `device:name`, the form `pw-link` prints.
    pub fn full_name(&self) -> String {
        format!("{}:{}", self.device, self.name)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.full_name(), f)
    }
}

/// An entry of a port inventory: either a plain port or the two channels
/// of a stereo pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortEntry {
    Mono(Port),
    Stereo { left: Port, right: Port },
}

impl PortEntry {
    /// The leaf ports of this entry, left before right.
    pub fn ports(&self) -> Vec<&Port> {
        match *self {
            PortEntry::Mono(ref port) => vec![port],
            PortEntry::Stereo { ref left, ref right } => vec![left, right],
        }
    }

    pub fn device(&self) -> &str {
        match *self {
            PortEntry::Mono(ref port) => port.device(),
            PortEntry::Stereo { ref left, .. } => left.device(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
    pub output: PortId,
    pub input: PortId,
}

impl Link {
    pub fn new(output: PortId, input: PortId) -> Link {
        Link { output, input }
    }

    pub fn connects(&self, output: &Port, input: &Port) -> bool {
        self.output == output.id() && self.input == input.id()
    }
}

const CHANNEL_PAIRS: &[(&str, &str)] =
    &[("FL", "FR"), ("L", "R"), ("left", "right"), ("Left", "Right")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Left,
    Right,
}

/// If `name` carries a channel token, returns the name of its partner
/// channel and which side `name` itself is.
fn stereo_partner(name: &str) -> Option<(String, Channel)> {
    let is_separator = |c: char| c == '_' || c == ' ' || c == '-';
    let mut start = 0;
    for (i, c) in name.char_indices().chain(std::iter::once((name.len(), '_'))) {
        if !is_separator(c) {
            continue;
        }
        let token = &name[start..i];
        for &(left, right) in CHANNEL_PAIRS {
            let (partner, channel) = if token == left {
                (right, Channel::Left)
            } else if token == right {
                (left, Channel::Right)
            } else {
                continue;
            };
            return Some((format!("{}{}{}", &name[..start], partner, &name[i..]), channel));
        }
        start = i + c.len_utf8();
    }
    None
}

/// Groups the left/right channel ports of each device into stereo entries.
///
/// The pair takes the position of whichever channel came first; every other
/// port keeps its place as a mono entry.
pub fn pair_stereo(ports: Vec<Port>) -> Vec<PortEntry> {
    let mut slots: Vec<Option<Port>> = ports.into_iter().map(Some).collect();
    let mut entries = Vec::with_capacity(slots.len());

    for i in 0..slots.len() {
        let port = match slots[i].take() {
            Some(port) => port,
            None => continue,
        };

        let partner = stereo_partner(port.name()).and_then(|(partner_name, channel)| {
            slots
                .iter()
                .position(|slot| match *slot {
                    Some(ref other) => {
                        other.device() == port.device() && other.name() == partner_name
                    }
                    None => false,
                })
                .map(|j| (j, channel))
        });

        match partner {
            Some((j, channel)) => match slots[j].take() {
                Some(other) if channel == Channel::Left => {
                    entries.push(PortEntry::Stereo { left: port, right: other })
                }
                Some(other) => entries.push(PortEntry::Stereo { left: other, right: port }),
                None => entries.push(PortEntry::Mono(port)),
            },
            None => entries.push(PortEntry::Mono(port)),
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(id: u32, device: &str, name: &str) -> Port {
        Port::new(PortId(id), device, name, PortDirection::Input)
    }

    #[test]
    fn partner_names() {
        assert_eq!(stereo_partner("playback_FL"), Some(("playback_FR".to_string(), Channel::Left)));
        assert_eq!(stereo_partner("monitor_FR"), Some(("monitor_FL".to_string(), Channel::Right)));
        assert_eq!(stereo_partner("left_out"), Some(("right_out".to_string(), Channel::Left)));
        assert_eq!(stereo_partner("Right In"), Some(("Left In".to_string(), Channel::Right)));
        assert_eq!(stereo_partner("playback_AUX0"), None);
        assert_eq!(stereo_partner("Midi Through Port-0 (capture)"), None);
        // "FLAT" is not a channel token
        assert_eq!(stereo_partner("FLAT_out"), None);
    }

    #[test]
    fn pairs_channels_of_the_same_device() {
        let ports = vec![
            input(1, "Scarlett", "playback_FL"),
            input(2, "Scarlett", "playback_FR"),
            input(3, "Midi-Bridge", "Midi Through Port-0 (playback)"),
        ];
        let entries = pair_stereo(ports);
        assert_eq!(entries.len(), 2);
        match entries[0] {
            PortEntry::Stereo { ref left, ref right } => {
                assert_eq!(left.id(), PortId(1));
                assert_eq!(right.id(), PortId(2));
            }
            ref other => panic!("expected a stereo pair, got {:?}", other),
        }
        assert_eq!(
            entries[1],
            PortEntry::Mono(input(3, "Midi-Bridge", "Midi Through Port-0 (playback)"))
        );
    }

    #[test]
    fn right_channel_listed_first_still_pairs() {
        let ports = vec![
            input(7, "Piano", "right_in"),
            input(3, "Other", "input"),
            input(6, "Piano", "left_in"),
        ];
        let entries = pair_stereo(ports);
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            PortEntry::Stereo {
                left: input(6, "Piano", "left_in"),
                right: input(7, "Piano", "right_in"),
            }
        );
        assert_eq!(entries[0].device(), "Piano");
    }

    #[test]
    fn channels_of_different_devices_stay_mono() {
        let ports = vec![input(1, "A", "playback_FL"), input(2, "B", "playback_FR")];
        let entries = pair_stereo(ports);
        assert!(entries.iter().all(|e| matches!(e, PortEntry::Mono(_))));
        assert_eq!(entries.len(), 2);
    }
}
