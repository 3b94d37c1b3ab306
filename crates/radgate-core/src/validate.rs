// ── Field validation ──
//
// Section-specific semantic checks, run locally before anything is sent
// to the device. First failing rule wins; there is no multi-error
// aggregation. The Display strings are the user-facing messages.

use thiserror::Error;

use crate::daemon::BusSettings;
use crate::section::{
    EthernetSettings, MODEM_LDPC, MODEM_MODES, MODEM_RATES, ModemSettings, WifiSettings,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("SSID is required")]
    SsidRequired,
    #[error("password must be at least 8 characters")]
    PasswordTooShort,
    #[error("invalid IP address")]
    InvalidIp,
    #[error("invalid netmask")]
    InvalidNetmask,
    #[error("invalid gateway")]
    InvalidGateway,
    #[error("invalid DNS 1")]
    InvalidDns1,
    #[error("invalid DNS 2")]
    InvalidDns2,
    #[error("unsupported mode")]
    UnsupportedMode,
    #[error("unsupported rate")]
    UnsupportedRate,
    #[error("unsupported LDPC profile")]
    UnsupportedLdpc,
    #[error("all bus fields are required")]
    BusIncomplete,
    #[error("SPI chip must look like spiN (e.g. spi0)")]
    InvalidSpiChip,
    #[error("SPI pin (CS) must be a number")]
    InvalidSpiPin,
    #[error("GPIO chip must look like gpiochipN (e.g. gpiochip1)")]
    InvalidGpioChip,
}

fn t(v: &Option<String>) -> &str {
    v.as_deref().map_or("", str::trim)
}

/// Canonical IPv4 syntax check: exactly four dot-separated decimal groups,
/// each 0-255, no non-canonical leading zeros (`01` is rejected, `0` is
/// fine).
pub fn is_valid_ipv4(value: &str) -> bool {
    let value = value.trim();
    let groups: Vec<&str> = value.split('.').collect();
    if groups.len() != 4 {
        return false;
    }
    groups.iter().all(|g| {
        !g.is_empty()
            && g.len() <= 3
            && g.bytes().all(|b| b.is_ascii_digit())
            && (g.len() == 1 || !g.starts_with('0'))
            && g.parse::<u16>().is_ok_and(|n| n <= 255)
    })
}

fn check_ip(value: &str, required: bool, err: ValidationError) -> Result<(), ValidationError> {
    if value.is_empty() {
        return if required { Err(err) } else { Ok(()) };
    }
    if is_valid_ipv4(value) { Ok(()) } else { Err(err) }
}

fn check_static_addressing(
    ip_config: &str,
    ip: &str,
    netmask: &str,
    gateway: &str,
    dns1: &str,
    dns2: &str,
) -> Result<(), ValidationError> {
    if ip_config != "static" {
        return Ok(());
    }
    check_ip(ip, true, ValidationError::InvalidIp)?;
    check_ip(netmask, true, ValidationError::InvalidNetmask)?;
    check_ip(gateway, false, ValidationError::InvalidGateway)?;
    check_ip(dns1, false, ValidationError::InvalidDns1)?;
    check_ip(dns2, false, ValidationError::InvalidDns2)?;
    Ok(())
}

/// Wireless: SSID required; client role needs a WPA2-length credential;
/// static addressing needs syntactically valid addresses.
pub fn validate_wifi(v: &WifiSettings) -> Result<(), ValidationError> {
    if t(&v.ssid).is_empty() {
        return Err(ValidationError::SsidRequired);
    }
    if t(&v.mode) == "client" && v.password.as_deref().unwrap_or("").len() < 8 {
        return Err(ValidationError::PasswordTooShort);
    }
    check_static_addressing(
        t(&v.ip_config),
        t(&v.ip),
        t(&v.netmask),
        t(&v.gateway),
        t(&v.dns1),
        t(&v.dns2),
    )
}

/// Wired: static addressing rules only.
pub fn validate_ethernet(v: &EthernetSettings) -> Result<(), ValidationError> {
    check_static_addressing(
        t(&v.ip_config),
        t(&v.ip),
        t(&v.netmask),
        t(&v.gateway),
        t(&v.dns1),
        t(&v.dns2),
    )
}

/// Radio modem: every field must be a member of its enumeration.
pub fn validate_modem(v: &ModemSettings) -> Result<(), ValidationError> {
    if !MODEM_MODES.contains(&t(&v.mode)) {
        return Err(ValidationError::UnsupportedMode);
    }
    if !MODEM_RATES.contains(&t(&v.rate)) {
        return Err(ValidationError::UnsupportedRate);
    }
    if !MODEM_LDPC.contains(&t(&v.ldpc)) {
        return Err(ValidationError::UnsupportedLdpc);
    }
    Ok(())
}

fn is_gpiochip_name(value: &str) -> bool {
    let name = value.strip_prefix("/dev/").unwrap_or(value);
    name.strip_prefix("gpiochip")
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

fn is_spi_chip_name(value: &str) -> bool {
    value
        .strip_prefix("spi")
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Bus/GPIO group: all fields required; chip identifiers must follow the
/// `spiN` / `gpiochipN` naming; line identifiers may be numbers or names.
pub fn validate_bus(v: &BusSettings) -> Result<(), ValidationError> {
    if !v.is_complete() {
        return Err(ValidationError::BusIncomplete);
    }
    if !is_spi_chip_name(t(&v.spi_chip)) {
        return Err(ValidationError::InvalidSpiChip);
    }
    let pin = t(&v.spi_pin);
    if pin.is_empty() || !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidSpiPin);
    }
    for chip in [
        &v.gpio_irq_chip,
        &v.gpio_busy_chip,
        &v.gpio_nrst_chip,
        &v.gpio_tx_en_chip,
        &v.gpio_rx_en_chip,
    ] {
        if !is_gpiochip_name(t(chip)) {
            return Err(ValidationError::InvalidGpioChip);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_accepts_canonical_addresses() {
        for addr in ["0.0.0.0", "192.168.1.10", "255.255.255.255", "10.0.0.1"] {
            assert!(is_valid_ipv4(addr), "{addr} should be valid");
        }
    }

    #[test]
    fn ipv4_rejects_out_of_range_and_malformed() {
        for addr in [
            "256.1.1.1",
            "1.2.3",
            "1.2.3.4.5",
            "a.b.c.d",
            "1..2.3",
            "",
            "1.2.3.4 extra",
        ] {
            assert!(!is_valid_ipv4(addr), "{addr} should be invalid");
        }
    }

    #[test]
    fn ipv4_rejects_non_canonical_leading_zeros() {
        assert!(!is_valid_ipv4("192.168.01.1"));
        assert!(!is_valid_ipv4("00.1.1.1"));
        assert!(is_valid_ipv4("0.1.1.1"));
    }

    fn wifi_client(ssid: &str, password: &str) -> WifiSettings {
        WifiSettings {
            mode: Some("client".into()),
            ssid: Some(ssid.into()),
            password: Some(password.into()),
            ip_config: Some("dhcp".into()),
            ..WifiSettings::default()
        }
    }

    #[test]
    fn wifi_ssid_required_before_password_length() {
        // Both rules would fail; the SSID rule must win.
        let v = wifi_client("", "x");
        assert_eq!(validate_wifi(&v), Err(ValidationError::SsidRequired));
    }

    #[test]
    fn wifi_client_password_length() {
        assert_eq!(
            validate_wifi(&wifi_client("HomeNet", "short")),
            Err(ValidationError::PasswordTooShort)
        );
        assert_eq!(validate_wifi(&wifi_client("HomeNet", "longenough")), Ok(()));
        // Access-point role has no credential-length rule here.
        let mut ap = wifi_client("HomeNet", "");
        ap.mode = Some("ap".into());
        assert_eq!(validate_wifi(&ap), Ok(()));
    }

    #[test]
    fn wifi_static_addressing_rules() {
        let mut v = wifi_client("HomeNet", "longenough");
        v.ip_config = Some("static".into());
        assert_eq!(validate_wifi(&v), Err(ValidationError::InvalidIp));

        v.ip = Some("192.168.1.10".into());
        assert_eq!(validate_wifi(&v), Err(ValidationError::InvalidNetmask));

        v.netmask = Some("255.255.255.0".into());
        assert_eq!(validate_wifi(&v), Ok(()));

        // Gateway and DNS are optional but validated when present.
        v.gateway = Some("not-an-ip".into());
        assert_eq!(validate_wifi(&v), Err(ValidationError::InvalidGateway));
        v.gateway = Some("192.168.1.1".into());
        v.dns2 = Some("8.8.8".into());
        assert_eq!(validate_wifi(&v), Err(ValidationError::InvalidDns2));
    }

    #[test]
    fn ethernet_dhcp_needs_nothing() {
        let v = EthernetSettings {
            ip_config: Some("dhcp".into()),
            ..EthernetSettings::default()
        };
        assert_eq!(validate_ethernet(&v), Ok(()));
    }

    #[test]
    fn modem_enumerations() {
        let ok = ModemSettings {
            mode: Some("FSK2".into()),
            rate: Some("500".into()),
            ldpc: Some("768/256".into()),
        };
        assert_eq!(validate_modem(&ok), Ok(()));

        let mut bad = ok.clone();
        bad.mode = Some("FSK8".into());
        assert_eq!(validate_modem(&bad), Err(ValidationError::UnsupportedMode));

        let mut bad = ok.clone();
        bad.rate = Some("300".into());
        assert_eq!(validate_modem(&bad), Err(ValidationError::UnsupportedRate));

        let mut bad = ok;
        bad.ldpc = Some("1024/256".into());
        assert_eq!(validate_modem(&bad), Err(ValidationError::UnsupportedLdpc));
    }

    #[test]
    fn bus_chip_name_shapes() {
        assert!(is_gpiochip_name("gpiochip1"));
        assert!(is_gpiochip_name("/dev/gpiochip0"));
        assert!(!is_gpiochip_name("gpiochip"));
        assert!(!is_gpiochip_name("chip1"));
        assert!(is_spi_chip_name("spi0"));
        assert!(!is_spi_chip_name("spi"));
        assert!(!is_spi_chip_name("0"));
    }

    #[test]
    fn bus_validation_order() {
        let mut v = BusSettings::default();
        assert_eq!(validate_bus(&v), Err(ValidationError::BusIncomplete));

        v = BusSettings {
            spi_chip: Some("nope".into()),
            spi_pin: Some("0".into()),
            gpio_irq_chip: Some("gpiochip1".into()),
            gpio_irq_pin: Some("5".into()),
            gpio_busy_chip: Some("gpiochip1".into()),
            gpio_busy_pin: Some("6".into()),
            gpio_nrst_chip: Some("gpiochip1".into()),
            gpio_nrst_pin: Some("7".into()),
            gpio_tx_en_chip: Some("gpiochip1".into()),
            gpio_tx_en_pin: Some("8".into()),
            gpio_rx_en_chip: Some("gpiochip1".into()),
            gpio_rx_en_pin: Some("9".into()),
        };
        assert_eq!(validate_bus(&v), Err(ValidationError::InvalidSpiChip));

        v.spi_chip = Some("spi0".into());
        assert_eq!(validate_bus(&v), Ok(()));

        v.gpio_busy_chip = Some("1".into());
        assert_eq!(validate_bus(&v), Err(ValidationError::InvalidGpioChip));
    }
}
