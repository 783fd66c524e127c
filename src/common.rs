use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::backend::PwLink;
use crate::errors::*;
use crate::matching::{MatchOptions, PortSpec};
use crate::port::{pair_stereo, Link, Port, PortDirection, PortEntry};
use crate::routing::{apply_routes, Route, RouteReport};
use crate::traits::PortGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    #[serde(alias = "pw")]
    PipeWire,
    /// ALSA sequencer, MIDI ports only. Needs the `alsa-seq` feature.
    Alsa,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pipewire" | "pw" => Ok(BackendKind::PipeWire),
            "alsa" => Ok(BackendKind::Alsa),
            other => Err(format!("unknown backend `{}` (expected `pipewire` or `alsa`)", other)),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            BackendKind::PipeWire => "pipewire".fmt(f),
            BackendKind::Alsa => "alsa".fmt(f),
        }
    }
}

/// Looks up ports by name and connects them through one backend.
pub struct PortRouter {
    graph: Box<dyn PortGraph>,
    options: MatchOptions,
}

impl PortRouter {
    /// `client_name` is what the ALSA sequencer shows for us; pw-link ignores it.
    #[cfg_attr(not(all(target_os = "linux", feature = "alsa-seq")), allow(unused_variables))]
    pub fn new(backend: BackendKind, client_name: &str) -> Result<Self, InitError> {
        let graph: Box<dyn PortGraph> = match backend {
            BackendKind::PipeWire => Box::new(PwLink::new()?),
            #[cfg(all(target_os = "linux", feature = "alsa-seq"))]
            BackendKind::Alsa => Box::new(crate::backend::AlsaSeq::new(client_name)?),
            #[cfg(not(all(target_os = "linux", feature = "alsa-seq")))]
            BackendKind::Alsa => {
                return Err(InitError::Other(
                    "built without ALSA sequencer support (feature `alsa-seq`)".to_string(),
                ))
            }
        };
        Ok(Self::with_graph(graph))
    }

    pub fn with_graph(graph: Box<dyn PortGraph>) -> Self {
        PortRouter {
            graph,
            options: MatchOptions::default(),
        }
    }

    pub fn set_match_options(&mut self, options: MatchOptions) {
        self.options = options;
    }

    pub fn match_options(&self) -> MatchOptions {
        self.options
    }

    /// Input ports, stereo channels grouped.
    pub fn inputs(&self) -> Result<Vec<PortEntry>, PortInfoError> {
        Ok(pair_stereo(self.graph.ports(PortDirection::Input)?))
    }

    /// Output ports, stereo channels grouped.
    pub fn outputs(&self) -> Result<Vec<PortEntry>, PortInfoError> {
        Ok(pair_stereo(self.graph.ports(PortDirection::Output)?))
    }

    pub fn ports(&self, direction: PortDirection) -> Result<Vec<Port>, PortInfoError> {
        self.graph.ports(direction)
    }

    pub fn links(&self) -> Result<Vec<Link>, PortInfoError> {
        self.graph.links()
    }

    pub fn find_input(&self, spec: &PortSpec) -> Result<Option<Port>, PortInfoError> {
        Ok(spec.find_in(&self.inputs()?, self.options).cloned())
    }

    pub fn find_output(&self, spec: &PortSpec) -> Result<Option<Port>, PortInfoError> {
        Ok(spec.find_in(&self.outputs()?, self.options).cloned())
    }

    pub fn connect(&mut self, output: &Port, input: &Port) -> Result<(), ConnectError> {
        self.graph.connect(output, input)
    }

    pub fn disconnect(&mut self, output: &Port, input: &Port) -> Result<(), ConnectError> {
        self.graph.disconnect(output, input)
    }

    pub fn apply(
        &mut self,
        routes: &[Route],
        dry_run: bool,
    ) -> Result<Vec<RouteReport>, PortInfoError> {
        apply_routes(self.graph.as_mut(), routes, self.options, dry_run)
    }
}
