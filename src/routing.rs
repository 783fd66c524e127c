use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::*;
use crate::matching::{MatchOptions, PortSpec};
use crate::port::{pair_stereo, Link, Port, PortDirection};
use crate::traits::PortGraph;

/// One wanted connection, from an output port to an input port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Route {
    pub from: PortSpec,
    pub to: PortSpec,
}

impl Route {
    pub fn new(from: PortSpec, to: PortSpec) -> Route {
        Route { from, to }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Connected,
    AlreadyConnected,
    /// Both ports were found; nothing was changed because of a dry run.
    WouldConnect,
    SourceMissing,
    DestinationMissing,
    Failed(ConnectError),
}

impl fmt::Display for RouteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RouteOutcome::Connected => "connected".fmt(f),
            RouteOutcome::AlreadyConnected => "already connected".fmt(f),
            RouteOutcome::WouldConnect => "would connect".fmt(f),
            RouteOutcome::SourceMissing => "source port not found".fmt(f),
            RouteOutcome::DestinationMissing => "destination port not found".fmt(f),
            RouteOutcome::Failed(ref err) => write!(f, "failed: {}", err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteReport {
    pub route: Route,
    /// The ports the route resolved to, when both were found.
    pub ports: Option<(Port, Port)>,
    pub outcome: RouteOutcome,
}

impl RouteReport {
    pub fn is_satisfied(&self) -> bool {
        matches!(
            self.outcome,
            RouteOutcome::Connected | RouteOutcome::AlreadyConnected | RouteOutcome::WouldConnect
        )
    }
}

/// One status line: the resolved ports if both were found, else the route.
impl fmt::Display for RouteReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.ports {
            Some((ref from, ref to)) => write!(f, "{} -> {}: {}", from, to, self.outcome),
            None => write!(f, "{}: {}", self.route, self.outcome),
        }
    }
}

/// True when every route is connected, already was, or would be.
pub fn all_satisfied(reports: &[RouteReport]) -> bool {
    reports.iter().all(RouteReport::is_satisfied)
}

/// Resolves and connects every route, in order.
///
/// The port inventory and the existing links are read once up front. A
/// route whose source or destination cannot be found is skipped, and a
/// failed connection does not stop the remaining routes.
pub fn apply_routes(
    graph: &mut dyn PortGraph,
    routes: &[Route],
    options: MatchOptions,
    dry_run: bool,
) -> Result<Vec<RouteReport>, PortInfoError> {
    let outputs = pair_stereo(graph.ports(PortDirection::Output)?);
    let inputs = pair_stereo(graph.ports(PortDirection::Input)?);
    let mut links: Vec<Link> = graph.links()?;

    let mut reports = Vec::with_capacity(routes.len());
    for route in routes {
        let source = route.from.find_in(&outputs, options);
        let destination = route.to.find_in(&inputs, options);

        let (source, destination) = match (source, destination) {
            (Some(source), Some(destination)) => (source, destination),
            (None, _) => {
                warn!("skipping {}: no output port matches {}", route, route.from);
                reports.push(RouteReport {
                    route: route.clone(),
                    ports: None,
                    outcome: RouteOutcome::SourceMissing,
                });
                continue;
            }
            (_, None) => {
                warn!("skipping {}: no input port matches {}", route, route.to);
                reports.push(RouteReport {
                    route: route.clone(),
                    ports: None,
                    outcome: RouteOutcome::DestinationMissing,
                });
                continue;
            }
        };
        debug!("{} resolved to {} -> {}", route, source, destination);

        let outcome = if links.iter().any(|l| l.connects(source, destination)) {
            RouteOutcome::AlreadyConnected
        } else if dry_run {
            RouteOutcome::WouldConnect
        } else {
            match graph.connect(source, destination) {
                Ok(()) => {
                    links.push(Link::new(source.id(), destination.id()));
                    RouteOutcome::Connected
                }
                Err(ref e) if e.kind() == ConnectErrorKind::AlreadyConnected => {
                    RouteOutcome::AlreadyConnected
                }
                Err(e) => {
                    warn!("could not connect {} -> {}: {}", source, destination, e);
                    RouteOutcome::Failed(e)
                }
            }
        };

        reports.push(RouteReport {
            route: route.clone(),
            ports: Some((source.clone(), destination.clone())),
            outcome,
        });
    }

    Ok(reports)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::port::PortId;

    /// An in-memory graph.
    #[derive(Default)]
    pub struct MemoryGraph {
        pub outputs: Vec<Port>,
        pub inputs: Vec<Port>,
        pub links: Vec<Link>,
        pub refuse: Vec<PortId>,
        pub connect_calls: usize,
    }

    impl MemoryGraph {
        pub fn studio() -> MemoryGraph {
            let out = |id, device: &str, name: &str| {
                Port::new(PortId(id), device, name, PortDirection::Output)
            };
            let inp = |id, device: &str, name: &str| {
                Port::new(PortId(id), device, name, PortDirection::Input)
            };
            MemoryGraph {
                outputs: vec![
                    out(38, "Midi-Bridge", "Midi Through Port-0 (capture)"),
                    out(51, "MDA Piano", "left_out"),
                    out(52, "MDA Piano", "right_out"),
                ],
                inputs: vec![
                    inp(39, "Midi-Bridge", "Scarlett 4i4 4th Gen MIDI 1 (playback)"),
                    inp(80, "Scarlett 4i4 4th Gen Analog Surround", "playback_FL"),
                    inp(81, "Scarlett 4i4 4th Gen Analog Surround", "playback_FR"),
                    inp(90, "MDA Piano", "input"),
                ],
                ..Default::default()
            }
        }
    }

    impl PortGraph for MemoryGraph {
        fn ports(&self, direction: PortDirection) -> Result<Vec<Port>, PortInfoError> {
            Ok(match direction {
                PortDirection::Output => self.outputs.clone(),
                PortDirection::Input => self.inputs.clone(),
            })
        }

        fn links(&self) -> Result<Vec<Link>, PortInfoError> {
            Ok(self.links.clone())
        }

        fn connect(&mut self, output: &Port, input: &Port) -> Result<(), ConnectError> {
            crate::traits::check_directions(output, input)?;
            self.connect_calls += 1;
            if self.refuse.contains(&input.id()) {
                return Err(ConnectError::other("refused"));
            }
            let link = Link::new(output.id(), input.id());
            if self.links.contains(&link) {
                return Err(ConnectError::new(ConnectErrorKind::AlreadyConnected));
            }
            self.links.push(link);
            Ok(())
        }

        fn disconnect(&mut self, output: &Port, input: &Port) -> Result<(), ConnectError> {
            crate::traits::check_directions(output, input)?;
            let before = self.links.len();
            self.links.retain(|l| !l.connects(output, input));
            if self.links.len() == before {
                return Err(ConnectError::new(ConnectErrorKind::NotConnected));
            }
            Ok(())
        }
    }

    fn route(from: (&str, &str), to: (&str, &str)) -> Route {
        Route::new(PortSpec::new(from.0, from.1), PortSpec::new(to.0, to.1))
    }

    #[test]
    fn connects_found_ports_and_skips_missing_ones() {
        let mut graph = MemoryGraph::studio();
        let routes = vec![
            route(("MDA Piano", "left_out"), ("Scarlett 4i4 4th Gen Analog", "playback_FL")),
            route(("MDA Piano", "right_out"), ("Scarlett 4i4 4th Gen Analog", "playback_FR")),
            route(("Fluidsynth", "left"), ("Scarlett", "playback_FL")),
            route(("Midi-Bridge", "Midi Through Port-0"), ("Hydrogen", "midi_in")),
        ];
        let reports = apply_routes(&mut graph, &routes, MatchOptions::default(), false).unwrap();

        let outcomes: Vec<_> = reports.iter().map(|r| r.outcome.clone()).collect();
        assert_eq!(
            outcomes,
            vec![
                RouteOutcome::Connected,
                RouteOutcome::Connected,
                RouteOutcome::SourceMissing,
                RouteOutcome::DestinationMissing,
            ]
        );
        assert_eq!(
            graph.links,
            vec![Link::new(PortId(51), PortId(80)), Link::new(PortId(52), PortId(81))]
        );
        assert!(reports[0].is_satisfied());
        assert!(!reports[2].is_satisfied());
        assert_eq!(reports[2].ports, None);
    }

    #[test]
    fn existing_links_are_left_alone() {
        let mut graph = MemoryGraph::studio();
        graph.links.push(Link::new(PortId(38), PortId(90)));
        let routes = vec![
            route(("Midi-Bridge", "Midi Through"), ("MDA Piano", "input")),
            route(("Midi-Bridge", "Midi Through"), ("MDA Piano", "input")),
        ];
        let reports = apply_routes(&mut graph, &routes, MatchOptions::default(), false).unwrap();
        assert!(reports.iter().all(|r| r.outcome == RouteOutcome::AlreadyConnected));
        assert_eq!(graph.connect_calls, 0);
    }

    #[test]
    fn same_route_twice_connects_once() {
        let mut graph = MemoryGraph::studio();
        let r = route(("Midi-Bridge", "Midi Through"), ("MDA Piano", "input"));
        let routes = [r.clone(), r];
        let reports = apply_routes(&mut graph, &routes, MatchOptions::default(), false).unwrap();
        assert_eq!(reports[0].outcome, RouteOutcome::Connected);
        assert_eq!(reports[1].outcome, RouteOutcome::AlreadyConnected);
        assert_eq!(graph.connect_calls, 1);
    }

    #[test]
    fn failures_do_not_stop_later_routes() {
        let mut graph = MemoryGraph::studio();
        graph.refuse.push(PortId(80));
        let routes = vec![
            route(("MDA Piano", "left_out"), ("Scarlett", "playback_FL")),
            route(("MDA Piano", "right_out"), ("Scarlett", "playback_FR")),
        ];
        let reports = apply_routes(&mut graph, &routes, MatchOptions::default(), false).unwrap();
        match reports[0].outcome {
            RouteOutcome::Failed(ref e) => assert_eq!(e.kind(), ConnectErrorKind::Other),
            ref other => panic!("expected a failure, got {}", other),
        }
        assert_eq!(reports[1].outcome, RouteOutcome::Connected);
    }

    #[test]
    fn dry_run_changes_nothing() {
        let mut graph = MemoryGraph::studio();
        let routes = vec![route(("piano", "LEFT"), ("scarlett", "fl"))];
        let reports = apply_routes(&mut graph, &routes, MatchOptions::default(), true).unwrap();
        assert_eq!(reports[0].outcome, RouteOutcome::WouldConnect);
        let (source, destination) = reports[0].ports.clone().unwrap();
        assert_eq!((source.id(), destination.id()), (PortId(51), PortId(80)));
        assert!(graph.links.is_empty());
    }

    #[test]
    fn status_lines_and_overall_result() {
        let mut graph = MemoryGraph::studio();
        let routes = vec![
            route(("MDA Piano", "left_out"), ("Scarlett", "playback_FL")),
            route(("Fluidsynth", "left"), ("Scarlett", "playback_FL")),
        ];
        let reports = apply_routes(&mut graph, &routes, MatchOptions::default(), false).unwrap();

        assert_eq!(
            reports[0].to_string(),
            "MDA Piano:left_out -> Scarlett 4i4 4th Gen Analog Surround:playback_FL: connected"
        );
        assert_eq!(
            reports[1].to_string(),
            "Fluidsynth:left -> Scarlett:playback_FL: source port not found"
        );
        assert!(!all_satisfied(&reports));
        assert!(all_satisfied(&reports[..1]));

        // the second run finds the first link in place
        let reports =
            apply_routes(&mut graph, &routes[..1], MatchOptions::default(), false).unwrap();
        assert_eq!(reports[0].outcome, RouteOutcome::AlreadyConnected);
        assert!(all_satisfied(&reports));
        assert!(all_satisfied(&[]));
    }

    #[test]
    fn case_sensitive_routes() {
        let mut graph = MemoryGraph::studio();
        let routes = vec![route(("piano", "left_out"), ("Scarlett", "playback_FL"))];
        let options = MatchOptions::case_sensitive();
        let reports = apply_routes(&mut graph, &routes, options, false).unwrap();
        assert_eq!(reports[0].outcome, RouteOutcome::SourceMissing);
    }
}
