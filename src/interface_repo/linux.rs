// Linux-specific helpers: link state and link type from /sys/class/net.

use crate::models::{InterfaceKind, OperStatus};

/// ARPHRD_* values from <linux/if_arp.h> that matter for classification.
#[cfg(target_os = "linux")]
mod arphrd {
    pub const ETHER: u32 = 1;
    pub const TUNNEL: u32 = 768;
    pub const TUNNEL6: u32 = 769;
    pub const LOOPBACK: u32 = 772;
    pub const SIT: u32 = 776;
    pub const IPGRE: u32 = 778;
    pub const IEEE80211: u32 = 801;
    pub const NONE: u32 = 65534;
}

/// Read operstate for an interface. "unknown" with carrier=1 counts as up, which
/// is what PPP links and some virtual NICs report while passing traffic.
pub(super) fn read_oper_status(interface_name: &str) -> Option<OperStatus> {
    #[cfg(target_os = "linux")]
    {
        let base = format!("/sys/class/net/{}", interface_name);
        let state = std::fs::read_to_string(format!("{}/operstate", base)).ok()?;
        let status = OperStatus::from_operstate(&state);
        if status == OperStatus::Unknown {
            let carrier = std::fs::read_to_string(format!("{}/carrier", base)).unwrap_or_default();
            if carrier.trim() == "1" {
                return Some(OperStatus::Up);
            }
        }
        return Some(status);
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = interface_name;
        None
    }
}

/// Classify the link from /sys/class/net/<interface>/type and the wireless marker.
pub(super) fn read_interface_kind(interface_name: &str) -> Option<InterfaceKind> {
    #[cfg(target_os = "linux")]
    {
        let base = format!("/sys/class/net/{}", interface_name);
        let link_type = std::fs::read_to_string(format!("{}/type", base))
            .ok()?
            .trim()
            .parse::<u32>()
            .ok()?;
        let is_wireless = std::path::Path::new(&format!("{}/wireless", base)).exists()
            || std::path::Path::new(&format!("{}/phy80211", base)).exists();
        return Some(match link_type {
            arphrd::LOOPBACK => InterfaceKind::Loopback,
            arphrd::ETHER if is_wireless => InterfaceKind::Wireless,
            arphrd::IEEE80211 => InterfaceKind::Wireless,
            arphrd::ETHER => InterfaceKind::Ethernet,
            arphrd::TUNNEL | arphrd::TUNNEL6 | arphrd::SIT | arphrd::IPGRE | arphrd::NONE => {
                InterfaceKind::Tunnel
            }
            _ => InterfaceKind::Other,
        });
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = interface_name;
        None
    }
}

/// Name-based fallback when sysfs has nothing to say (other platforms, or the
/// interface vanished between list and status read).
pub(super) fn kind_from_name(interface_name: &str) -> InterfaceKind {
    let name = interface_name.to_lowercase();
    if name == "lo" || name.starts_with("lo0") || name.contains("loopback") {
        InterfaceKind::Loopback
    } else if ["tun", "tap", "utun", "wg", "ipsec", "gif", "stf", "teredo", "isatap"]
        .iter()
        .any(|p| name.starts_with(p))
    {
        InterfaceKind::Tunnel
    } else if name.starts_with("wl") || name.contains("wi-fi") || name.contains("wireless") {
        InterfaceKind::Wireless
    } else if name.starts_with("en") || name.starts_with("eth") || name.contains("ethernet") {
        InterfaceKind::Ethernet
    } else {
        InterfaceKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_name_recognizes_common_prefixes() {
        assert_eq!(kind_from_name("lo"), InterfaceKind::Loopback);
        assert_eq!(kind_from_name("lo0"), InterfaceKind::Loopback);
        assert_eq!(kind_from_name("eth0"), InterfaceKind::Ethernet);
        assert_eq!(kind_from_name("enp3s0"), InterfaceKind::Ethernet);
        assert_eq!(kind_from_name("wlan0"), InterfaceKind::Wireless);
        assert_eq!(kind_from_name("wlp2s0"), InterfaceKind::Wireless);
        assert_eq!(kind_from_name("Wi-Fi"), InterfaceKind::Wireless);
        assert_eq!(kind_from_name("tun0"), InterfaceKind::Tunnel);
        assert_eq!(kind_from_name("utun3"), InterfaceKind::Tunnel);
        assert_eq!(kind_from_name("wg0"), InterfaceKind::Tunnel);
        assert_eq!(kind_from_name("docker0"), InterfaceKind::Other);
    }

    #[test]
    fn missing_interface_has_no_sysfs_status() {
        assert!(read_oper_status("definitely-not-an-interface0").is_none());
        assert!(read_interface_kind("definitely-not-an-interface0").is_none());
    }
}
