use std::io::{ErrorKind, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::{Duration, Instant};

use crate::group::domain::process_group::{BarrierError, ProcessGroup};

const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);
const CONNECT_RETRY_INTERVAL: Duration = Duration::from_millis(25);

/// Cross-process rendezvous over TCP.
///
/// Rank 0 acts as the coordinator: it binds the coordinator address, waits
/// for every other rank to connect and announce itself, then releases them
/// all with a single byte. Non-zero ranks retry the connect until the
/// coordinator is listening. The whole exchange carries no payload beyond
/// the rank announcement; it only orders process exit.
///
/// Every step is bounded by one shared deadline. A peer that crashes before
/// arriving surfaces as `Timeout` (it never connected) or `PeerLost` (its
/// connection dropped), both fatal to the whole group by design.
pub struct TcpGroup {
    rank: usize,
    size: usize,
    coordinator: String,
    timeout: Duration,
}

impl TcpGroup {
    pub fn new(rank: usize, size: usize, coordinator: impl Into<String>, timeout: Duration) -> Self {
        Self {
            rank,
            size,
            coordinator: coordinator.into(),
            timeout,
        }
    }

    fn coordinate(&self, deadline: Instant) -> Result<(), BarrierError> {
        let listener = TcpListener::bind(&self.coordinator).map_err(|e| BarrierError::Connect {
            addr: self.coordinator.clone(),
            source: e,
        })?;
        listener.set_nonblocking(true)?;

        let mut arrived: Vec<TcpStream> = Vec::with_capacity(self.size - 1);
        while arrived.len() < self.size - 1 {
            match listener.accept() {
                Ok((mut stream, _)) => {
                    stream.set_nonblocking(false)?;
                    stream.set_read_timeout(Some(remaining(deadline, self.timeout)?))?;
                    // Fixed-width announce so ranks above 255 arrive intact.
                    let mut announce = [0u8; 8];
                    stream.read_exact(&mut announce).map_err(map_read_error(self.timeout))?;
                    log::debug!("barrier: rank {} arrived", u64::from_be_bytes(announce));
                    arrived.push(stream);
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    if Instant::now() >= deadline {
                        return Err(BarrierError::Timeout(self.timeout));
                    }
                    std::thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => return Err(BarrierError::Io(e)),
            }
        }

        for stream in &mut arrived {
            stream.write_all(&[0u8])?;
        }
        Ok(())
    }

    fn arrive(&self, deadline: Instant) -> Result<(), BarrierError> {
        let mut stream = loop {
            match TcpStream::connect(&self.coordinator) {
                Ok(stream) => break stream,
                Err(e) => {
                    if Instant::now() >= deadline {
                        return Err(BarrierError::Connect {
                            addr: self.coordinator.clone(),
                            source: e,
                        });
                    }
                    std::thread::sleep(CONNECT_RETRY_INTERVAL);
                }
            }
        };

        stream.write_all(&(self.rank as u64).to_be_bytes())?;
        stream.set_read_timeout(Some(remaining(deadline, self.timeout)?))?;
        let mut release = [0u8; 1];
        stream.read_exact(&mut release).map_err(map_read_error(self.timeout))?;
        Ok(())
    }
}

fn remaining(deadline: Instant, timeout: Duration) -> Result<Duration, BarrierError> {
    let left = deadline.saturating_duration_since(Instant::now());
    if left.is_zero() {
        return Err(BarrierError::Timeout(timeout));
    }
    Ok(left)
}

fn map_read_error(timeout: Duration) -> impl Fn(std::io::Error) -> BarrierError {
    move |e| match e.kind() {
        ErrorKind::UnexpectedEof => BarrierError::PeerLost,
        ErrorKind::WouldBlock | ErrorKind::TimedOut => BarrierError::Timeout(timeout),
        _ => BarrierError::Io(e),
    }
}

impl ProcessGroup for TcpGroup {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn barrier(&self) -> Result<(), BarrierError> {
        if self.size <= 1 {
            return Ok(());
        }
        let deadline = Instant::now() + self.timeout;
        if self.rank == 0 {
            self.coordinate(deadline)
        } else {
            self.arrive(deadline)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_addr() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);
        addr
    }

    #[test]
    fn test_two_ranks_rendezvous() {
        let addr = free_addr();
        let timeout = Duration::from_secs(5);

        let coordinator = TcpGroup::new(0, 2, addr.clone(), timeout);
        let peer = TcpGroup::new(1, 2, addr, timeout);

        // The peer starts first to exercise the connect retry.
        let peer_handle = std::thread::spawn(move || peer.barrier());
        std::thread::sleep(Duration::from_millis(50));
        let coordinator_handle = std::thread::spawn(move || coordinator.barrier());

        assert!(peer_handle.join().unwrap().is_ok());
        assert!(coordinator_handle.join().unwrap().is_ok());
    }

    #[test]
    fn test_three_ranks_rendezvous() {
        let addr = free_addr();
        let timeout = Duration::from_secs(5);
        let handles: Vec<_> = (0..3)
            .map(|rank| {
                let group = TcpGroup::new(rank, 3, addr.clone(), timeout);
                std::thread::spawn(move || group.barrier())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
    }

    #[test]
    fn test_ranks_above_byte_range_rendezvous() {
        let addr = free_addr();
        let timeout = Duration::from_secs(5);

        let coordinator = TcpGroup::new(0, 2, addr.clone(), timeout);
        let peer = TcpGroup::new(300, 2, addr, timeout);

        let peer_handle = std::thread::spawn(move || peer.barrier());
        let coordinator_handle = std::thread::spawn(move || coordinator.barrier());

        assert!(peer_handle.join().unwrap().is_ok());
        assert!(coordinator_handle.join().unwrap().is_ok());
    }

    #[test]
    fn test_coordinator_times_out_when_a_peer_never_arrives() {
        let addr = free_addr();
        let group = TcpGroup::new(0, 2, addr, Duration::from_millis(200));
        match group.barrier() {
            Err(BarrierError::Timeout(_)) => {}
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_peer_fails_when_no_coordinator_exists() {
        let addr = free_addr();
        let group = TcpGroup::new(1, 2, addr, Duration::from_millis(200));
        assert!(group.barrier().is_err());
    }

    #[test]
    fn test_size_one_group_needs_no_network() {
        let group = TcpGroup::new(0, 1, "127.0.0.1:1", Duration::from_millis(100));
        assert!(group.barrier().is_ok());
    }
}
