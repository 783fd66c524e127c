use crate::errors::*;
use crate::port::{Link, Port, PortDirection};

/// A routing layer that exposes ports and can link them.
pub trait PortGraph {
    fn ports(&self, direction: PortDirection) -> Result<Vec<Port>, PortInfoError>;

    fn links(&self) -> Result<Vec<Link>, PortInfoError>;

    fn connect(&mut self, output: &Port, input: &Port) -> Result<(), ConnectError>;

    fn disconnect(&mut self, output: &Port, input: &Port) -> Result<(), ConnectError>;
}

/// Rejects anything that is not an (output, input) pair.
pub(crate) fn check_directions(output: &Port, input: &Port) -> Result<(), ConnectError> {
    if output.direction() != PortDirection::Output || input.direction() != PortDirection::Input {
        let detail = format!(
            "{} ({}) -> {} ({})",
            output,
            output.direction(),
            input,
            input.direction()
        );
        return Err(ConnectError::new(ConnectErrorKind::InvalidPort).with_detail(detail));
    }
    Ok(())
}
