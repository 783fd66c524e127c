//! ALSA sequencer backend, for MIDI-only setups without PipeWire.

use std::ffi::CString;

use alsa::seq::{
    Addr, ClientIter, PortCap, PortInfo, PortIter, PortSubscribe, PortSubscribeIter, PortType,
    QuerySubsType, Seq,
};
use log::{debug, info};

use crate::errors::*;
use crate::port::{Link, Port, PortDirection, PortId};
use crate::traits::{check_directions, PortGraph};

pub struct AlsaSeq {
    seq: Seq,
}

impl AlsaSeq {
    pub fn new(client_name: &str) -> Result<Self, InitError> {
        let seq = Seq::open(None, None, false).map_err(|e| InitError::Other(e.to_string()))?;
        let c_client_name = CString::new(client_name)
            .map_err(|_| InitError::Other("client name contains a null byte".to_string()))?;
        seq.set_client_name(&c_client_name).map_err(|e| InitError::Other(e.to_string()))?;
        Ok(AlsaSeq { seq })
    }

    fn collect_ports(&self, direction: PortDirection) -> Vec<(Addr, Port)> {
        let caps = required_caps(direction);
        let mut ports = Vec::new();
        for client in ClientIter::new(&self.seq) {
            // client 0 is the "System" client with timer and announce ports
            if client.get_client() == 0 {
                continue;
            }
            let device = client.get_name().unwrap_or("").to_string();
            for pinfo in PortIter::new(&self.seq, client.get_client()) {
                if !is_midi_port(&pinfo) || !pinfo.get_capability().contains(caps) {
                    continue;
                }
                let addr = pinfo.addr();
                let name = pinfo.get_name().unwrap_or("").to_string();
                ports.push((addr, Port::new(encode_addr(addr), device.clone(), name, direction)));
            }
        }
        ports
    }
}

fn required_caps(direction: PortDirection) -> PortCap {
    match direction {
        PortDirection::Output => PortCap::READ | PortCap::SUBS_READ,
        PortDirection::Input => PortCap::WRITE | PortCap::SUBS_WRITE,
    }
}

fn is_midi_port(pinfo: &PortInfo) -> bool {
    let typ = pinfo.get_type();
    typ.contains(PortType::MIDI_GENERIC) || typ.contains(PortType::SYNTH)
}

fn encode_addr(addr: Addr) -> PortId {
    PortId(((addr.client as u32) << 16) | (addr.port as u32 & 0xffff))
}

fn decode_addr(id: PortId) -> Addr {
    Addr {
        client: (id.0 >> 16) as i32,
        port: (id.0 & 0xffff) as i32,
    }
}

impl PortGraph for AlsaSeq {
    fn ports(&self, direction: PortDirection) -> Result<Vec<Port>, PortInfoError> {
        Ok(self.collect_ports(direction).into_iter().map(|(_, port)| port).collect())
    }

    fn links(&self) -> Result<Vec<Link>, PortInfoError> {
        let mut links = Vec::new();
        for (addr, port) in self.collect_ports(PortDirection::Output) {
            for sub in PortSubscribeIter::new(&self.seq, addr, QuerySubsType::READ) {
                links.push(Link::new(port.id(), encode_addr(sub.get_dest())));
            }
        }
        Ok(links)
    }

    fn connect(&mut self, output: &Port, input: &Port) -> Result<(), ConnectError> {
        check_directions(output, input)?;
        let sub = PortSubscribe::empty().map_err(|e| ConnectError::other(e.to_string()))?;
        sub.set_sender(decode_addr(output.id()));
        sub.set_dest(decode_addr(input.id()));
        debug!("subscribing {:?} -> {:?}", sub.get_sender(), sub.get_dest());
        match self.seq.subscribe_port(&sub) {
            Ok(()) => {
                info!("connected {} -> {}", output, input);
                Ok(())
            }
            Err(e) if e.errno() == libc::EBUSY => {
                Err(ConnectError::new(ConnectErrorKind::AlreadyConnected))
            }
            Err(e) => Err(ConnectError::other(e.to_string())),
        }
    }

    fn disconnect(&mut self, output: &Port, input: &Port) -> Result<(), ConnectError> {
        check_directions(output, input)?;
        match self.seq.unsubscribe_port(decode_addr(output.id()), decode_addr(input.id())) {
            Ok(()) => {
                info!("disconnected {} -> {}", output, input);
                Ok(())
            }
            Err(e) if e.errno() == libc::ENOENT => {
                Err(ConnectError::new(ConnectErrorKind::NotConnected))
            }
            Err(e) => Err(ConnectError::other(e.to_string())),
        }
    }
}
