//! Admission rules shared by the validator and the executor.
//!
//! Checks run in a fixed order: membership conditions first (ip before public
//! key for additions), then the trust value.

use crate::command::Command;
use crate::error::PeerError;
use crate::peer::registry::clamp_trust;
use crate::peer::{Node, PeerSet};

fn check_trust_value(value: f64) -> Result<(), PeerError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PeerError::NonFiniteTrust(value))
    }
}

fn unknown(public_key: &str) -> PeerError {
    PeerError::UnknownPeer(public_key.to_string())
}

pub(crate) fn check_add(set: &PeerSet, node: &Node) -> Result<(), PeerError> {
    if set.exists_by_ip(&node.ip) {
        return Err(PeerError::DuplicateIp(node.ip.clone()));
    }
    if set.exists_by_public_key(&node.public_key) {
        return Err(PeerError::DuplicatePublicKey(node.public_key.clone()));
    }
    check_trust_value(node.trust)
}

pub(crate) fn check_known(set: &PeerSet, public_key: &str) -> Result<(), PeerError> {
    if set.exists_by_public_key(public_key) {
        Ok(())
    } else {
        Err(unknown(public_key))
    }
}

pub(crate) fn check_trust_update(
    set: &PeerSet,
    public_key: &str,
    value: f64,
) -> Result<(), PeerError> {
    check_known(set, public_key)?;
    check_trust_value(value)
}

pub(crate) fn check(set: &PeerSet, command: &Command) -> Result<(), PeerError> {
    match command {
        Command::AddPeer { node } => check_add(set, node),
        Command::RemovePeer { public_key } | Command::SetActive { public_key, .. } => {
            check_known(set, public_key)
        }
        Command::SetTrust { public_key, value } => check_trust_update(set, public_key, *value),
        Command::ChangeTrust { public_key, delta } => check_trust_update(set, public_key, *delta),
    }
}

pub(crate) fn apply_add(set: &mut PeerSet, node: &Node) -> Result<(), PeerError> {
    check_add(set, node)?;
    let mut node = node.clone();
    node.trust = set.clamp_trust(node.trust);
    set.insert(node);
    Ok(())
}

pub(crate) fn apply_remove(set: &mut PeerSet, public_key: &str) -> Result<(), PeerError> {
    match set.remove(public_key) {
        Some(_) => Ok(()),
        None => Err(unknown(public_key)),
    }
}

pub(crate) fn apply_set_trust(
    set: &mut PeerSet,
    public_key: &str,
    value: f64,
) -> Result<(), PeerError> {
    let max_trust = set.max_trust();
    let node = set
        .find_by_public_key_mut(public_key)
        .ok_or_else(|| unknown(public_key))?;
    check_trust_value(value)?;
    node.trust = clamp_trust(value, max_trust);
    Ok(())
}

pub(crate) fn apply_change_trust(
    set: &mut PeerSet,
    public_key: &str,
    delta: f64,
) -> Result<(), PeerError> {
    let max_trust = set.max_trust();
    let node = set
        .find_by_public_key_mut(public_key)
        .ok_or_else(|| unknown(public_key))?;
    check_trust_value(delta)?;
    node.trust = clamp_trust(node.trust + delta, max_trust);
    Ok(())
}

pub(crate) fn apply_set_active(
    set: &mut PeerSet,
    public_key: &str,
    flag: bool,
) -> Result<(), PeerError> {
    let node = set
        .find_by_public_key_mut(public_key)
        .ok_or_else(|| unknown(public_key))?;
    node.active = flag;
    Ok(())
}

pub(crate) fn apply(set: &mut PeerSet, command: &Command) -> Result<(), PeerError> {
    match command {
        Command::AddPeer { node } => apply_add(set, node),
        Command::RemovePeer { public_key } => apply_remove(set, public_key),
        Command::SetTrust { public_key, value } => apply_set_trust(set, public_key, *value),
        Command::ChangeTrust { public_key, delta } => apply_change_trust(set, public_key, *delta),
        Command::SetActive { public_key, flag } => apply_set_active(set, public_key, *flag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_with_a() -> PeerSet {
        let mut set = PeerSet::new(100.0);
        apply_add(&mut set, &Node::new("10.0.0.1", "pkA", 100.0)).unwrap();
        set
    }

    #[test]
    fn test_check_and_apply_agree() {
        let commands = vec![
            Command::add_peer(Node::new("10.0.0.1", "pkZ", 1.0)),
            Command::add_peer(Node::new("10.0.0.9", "pkA", 1.0)),
            Command::add_peer(Node::new("10.0.0.2", "pkB", 1.0)),
            Command::add_peer(Node::new("10.0.0.3", "pkC", f64::NAN)),
            Command::remove_peer("pkA"),
            Command::remove_peer("pkZ"),
            Command::set_trust("pkA", 5.0),
            Command::set_trust("pkZ", 5.0),
            Command::set_trust("pkA", f64::INFINITY),
            Command::set_trust("pkZ", f64::NAN),
            Command::change_trust("pkA", -5.0),
            Command::change_trust("pkZ", -5.0),
            Command::set_active("pkA", true),
            Command::set_active("pkZ", true),
        ];

        for command in commands {
            let set = set_with_a();
            let checked = check(&set, &command);
            let mut scratch = set.clone();
            let applied = apply(&mut scratch, &command);
            // Compared as text: NaN payloads are never equal to themselves.
            assert_eq!(
                checked.map_err(|e| e.to_string()),
                applied.clone().map_err(|e| e.to_string()),
                "{:?}",
                command
            );
            if applied.is_err() {
                assert_eq!(scratch.iter().collect::<Vec<_>>(), set.iter().collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_unknown_peer_reported_before_bad_value() {
        let set = set_with_a();
        assert_eq!(
            check(&set, &Command::set_trust("pkZ", f64::NAN)),
            Err(PeerError::UnknownPeer("pkZ".to_string()))
        );
    }

    #[test]
    fn test_change_trust_clamps_both_ends() {
        let mut set = set_with_a();
        apply_change_trust(&mut set, "pkA", 50.0).unwrap();
        assert_eq!(set.find_by_public_key("pkA").unwrap().trust, 100.0);
        apply_change_trust(&mut set, "pkA", -250.0).unwrap();
        assert_eq!(set.find_by_public_key("pkA").unwrap().trust, 0.0);
        apply_change_trust(&mut set, "pkA", 12.5).unwrap();
        assert_eq!(set.find_by_public_key("pkA").unwrap().trust, 12.5);
    }

    #[test]
    fn test_add_clamps_initial_trust() {
        let mut set = PeerSet::new(10.0);
        apply_add(&mut set, &Node::new("10.0.0.1", "pkA", 99.0)).unwrap();
        apply_add(&mut set, &Node::new("10.0.0.2", "pkB", -1.0)).unwrap();
        assert_eq!(set.find_by_public_key("pkA").unwrap().trust, 10.0);
        assert_eq!(set.find_by_public_key("pkB").unwrap().trust, 0.0);
    }
}
