use std::fmt;

use serde::{Deserialize, Serialize};

use crate::port::{Port, PortEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOptions {
    /// Compare names and device labels exactly instead of ignoring case.
    pub case_sensitive: bool,
}

impl MatchOptions {
    pub fn case_sensitive() -> MatchOptions {
        MatchOptions { case_sensitive: true }
    }

    fn contains(&self, haystack: &str, needle: &str) -> bool {
        if self.case_sensitive {
            haystack.contains(needle)
        } else {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }
    }
}

/// What to look for: a substring of the port name and a substring of the
/// label of the device owning it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortSpec {
    pub device: String,
    pub name: String,
}

impl PortSpec {
    pub fn new<D: Into<String>, N: Into<String>>(device: D, name: N) -> PortSpec {
        PortSpec {
            device: device.into(),
            name: name.into(),
        }
    }

    pub fn matches(&self, port: &Port, options: MatchOptions) -> bool {
        port_matches(port, &self.name, &self.device, options)
    }

    pub fn find_in<'a>(&self, entries: &'a [PortEntry], options: MatchOptions) -> Option<&'a Port> {
        match_port(entries, &self.name, &self.device, options)
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.device, self.name)
    }
}

pub fn port_matches(port: &Port, name: &str, device: &str, options: MatchOptions) -> bool {
    options.contains(port.name(), name) && options.contains(port.device(), device)
}

/// Returns the first port, in inventory order, whose name contains `name`
/// and whose device label contains `device`.
///
/// Stereo entries are searched left channel first. An empty `name` or
/// `device` matches anything.
pub fn match_port<'a>(
    entries: &'a [PortEntry],
    name: &str,
    device: &str,
    options: MatchOptions,
) -> Option<&'a Port> {
    entries.iter().find_map(|entry| match *entry {
        PortEntry::Mono(ref port) => Some(port).filter(|p| port_matches(p, name, device, options)),
        PortEntry::Stereo { ref left, ref right } => [left, right]
            .into_iter()
            .find(|p| port_matches(p, name, device, options)),
    })
}

/// Same as [`match_port`] over a flat list of ports.
pub fn find_port<'a>(
    ports: &'a [Port],
    name: &str,
    device: &str,
    options: MatchOptions,
) -> Option<&'a Port> {
    ports.iter().find(|p| port_matches(p, name, device, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{pair_stereo, PortDirection, PortId};

    fn output(id: u32, device: &str, name: &str) -> Port {
        Port::new(PortId(id), device, name, PortDirection::Output)
    }

    fn inventory() -> Vec<PortEntry> {
        pair_stereo(vec![
            output(40, "Midi-Bridge", "Midi Through Port-0 (capture)"),
            output(51, "MDA Piano", "left_out"),
            output(52, "MDA Piano", "right_out"),
            output(60, "alsa_output.usb-Focusrite_Scarlett_4i4", "monitor_FL"),
            output(61, "alsa_output.usb-Focusrite_Scarlett_4i4", "monitor_FR"),
        ])
    }

    #[test]
    fn matches_ignoring_case_by_default() {
        let entries = inventory();
        let port = match_port(&entries, "LEFT_OUT", "mda piano", MatchOptions::default());
        assert_eq!(port.map(Port::id), Some(PortId(51)));
    }

    #[test]
    fn case_sensitive_matching() {
        let entries = inventory();
        let options = MatchOptions::case_sensitive();
        assert_eq!(match_port(&entries, "LEFT_OUT", "MDA Piano", options), None);
        let port = match_port(&entries, "left_out", "MDA Piano", options);
        assert_eq!(port.map(Port::id), Some(PortId(51)));
    }

    #[test]
    fn searches_left_channel_before_right() {
        let entries = inventory();
        // both channels contain "monitor"
        let port = match_port(&entries, "monitor", "Scarlett", MatchOptions::default());
        assert_eq!(port.map(Port::id), Some(PortId(60)));
        let port = match_port(&entries, "_out", "Piano", MatchOptions::default());
        assert_eq!(port.map(Port::id), Some(PortId(51)));
    }

    #[test]
    fn returns_first_match_in_inventory_order() {
        let entries = inventory();
        let port = match_port(&entries, "", "", MatchOptions::default());
        assert_eq!(port.map(Port::id), Some(PortId(40)));
    }

    #[test]
    fn both_name_and_device_must_match() {
        let entries = inventory();
        assert_eq!(match_port(&entries, "left_out", "Scarlett", MatchOptions::default()), None);
        assert_eq!(match_port(&entries, "playback_FL", "", MatchOptions::default()), None);
        assert_eq!(match_port(&[], "left_out", "MDA Piano", MatchOptions::default()), None);
    }

    #[test]
    fn flat_search_and_specs() {
        let ports = vec![output(1, "MDA Piano", "left_out"), output(2, "MDA Piano", "right_out")];
        let spec = PortSpec::new("piano", "right");
        let port = find_port(&ports, &spec.name, &spec.device, MatchOptions::default());
        assert_eq!(port.map(Port::id), Some(PortId(2)));
        assert!(spec.matches(&ports[1], MatchOptions::default()));
        assert!(!spec.matches(&ports[1], MatchOptions::case_sensitive()));
        assert_eq!(spec.to_string(), "piano:right");
    }
}
