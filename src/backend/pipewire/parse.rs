use crate::errors::PortInfoError;
use crate::port::{Link, Port, PortDirection, PortId};

/// Splits `device:port` at the first colon.
pub fn split_full_name(full_name: &str) -> Option<(&str, &str)> {
    let (device, name) = full_name.split_once(':')?;
    if device.is_empty() || name.is_empty() {
        return None;
    }
    Some((device, name))
}

/// Splits a leading numeric id off a line, e.g. `"  38 Midi-Bridge:x"`.
fn split_id(line: &str) -> Option<(u32, &str)> {
    let line = line.trim_start();
    let end = line.find(|c: char| !c.is_ascii_digit())?;
    let id = line[..end].parse().ok()?;
    Some((id, line[end..].trim_start()))
}

/// Parses the output of `pw-link --output --id` or `pw-link --input --id`.
pub fn parse_ports(listing: &str, direction: PortDirection) -> Result<Vec<Port>, PortInfoError> {
    let mut ports = Vec::new();
    for line in listing.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('|') {
            continue;
        }
        let (id, full_name) =
            split_id(trimmed).ok_or_else(|| PortInfoError::Malformed(line.to_string()))?;
        // alias or link lines of a verbose listing
        if full_name.starts_with('|') {
            continue;
        }
        let (device, name) = split_full_name(full_name)
            .ok_or_else(|| PortInfoError::Malformed(line.to_string()))?;
        ports.push(Port::new(PortId(id), device, name, direction));
    }
    Ok(ports)
}

/// Parses the output of `pw-link --links --id`.
///
/// Every link shows up twice, once under its output and once under its
/// input; the result holds each link once, in order of first appearance.
pub fn parse_links(listing: &str) -> Result<Vec<Link>, PortInfoError> {
    let mut links: Vec<Link> = Vec::new();
    let mut current: Option<PortId> = None;

    for line in listing.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        // the link id in front of the arrow is optional
        let rest = match split_id(trimmed) {
            Some((_, rest)) if rest.starts_with('|') => rest,
            Some((id, _)) => {
                current = Some(PortId(id));
                continue;
            }
            None if trimmed.starts_with('|') => trimmed,
            None => return Err(PortInfoError::Malformed(line.to_string())),
        };

        let (outgoing, peer) = if let Some(peer) = rest.strip_prefix("|->") {
            (true, peer)
        } else if let Some(peer) = rest.strip_prefix("|<-") {
            (false, peer)
        } else {
            return Err(PortInfoError::Malformed(line.to_string()));
        };

        let (peer, _) = split_id(peer).ok_or_else(|| PortInfoError::Malformed(line.to_string()))?;
        let current = current.ok_or_else(|| PortInfoError::Malformed(line.to_string()))?;
        let link = if outgoing {
            Link::new(current, PortId(peer))
        } else {
            Link::new(PortId(peer), current)
        };
        if !links.contains(&link) {
            links.push(link);
        }
    }

    Ok(links)
}
