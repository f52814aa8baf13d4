//! Traffic Report (type 0x14) field decoding.
//!
//! Twenty-seven densely packed field bytes:
//! `st aa aa aa ll ll ll nn nn nn dd dm ia hh hv vv tt ee cc cc cc cc cc
//! cc cc cc px`
//! - status nibbles, 24-bit participant address (MS byte first)
//! - latitude/longitude as 24-bit signed angular fractions
//! - 12-bit altitude + misc nibble, NIC/NACp nibbles
//! - 12-bit horizontal and 12-bit signed vertical velocity
//! - heading byte, emitter category, 8-char callsign, priority nibble

use serde::Serialize;
use tracing::warn;

/// Expected traffic report payload length, FCS excluded.
pub const TRAFFIC_REPORT_LEN: usize = 27;

/// Latitude/longitude resolution: 180 / 2^23 degrees per count.
const ANGULAR_RESOLUTION: f64 = 180.0 / 8_388_608.0;

/// Heading resolution: 360 / 256 degrees per count.
const HEADING_RESOLUTION: f64 = 360.0 / 256.0;

/// Raw altitude value meaning "no altitude data".
const ALTITUDE_UNAVAILABLE: u16 = 0xFFF;

/// Raw horizontal velocity meaning "not available".
const HVEL_UNAVAILABLE: u16 = 0xFFF;

/// Raw vertical velocity meaning "not available".
const VVEL_UNAVAILABLE: u16 = 0x800;

// ---------------------------------------------------------------------------
// Field enums
// ---------------------------------------------------------------------------

/// Traffic alert state from the upper status nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrafficAlertStatus {
    NoAlert,
    TrafficAlert,
    Reserved(u8),
}

impl TrafficAlertStatus {
    pub fn from_nibble(nibble: u8) -> TrafficAlertStatus {
        match nibble & 0x0F {
            0 => TrafficAlertStatus::NoAlert,
            1 => TrafficAlertStatus::TrafficAlert,
            r => TrafficAlertStatus::Reserved(r),
        }
    }
}

/// How the participant address should be interpreted, from the lower
/// status nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TargetIdentity {
    AdsbIcao,
    AdsbSelfAssigned,
    TisbIcao,
    TisbTrackFile,
    SurfaceVehicle,
    GroundStationBeacon,
    Reserved(u8),
}

impl TargetIdentity {
    pub fn from_nibble(nibble: u8) -> TargetIdentity {
        match nibble & 0x0F {
            0 => TargetIdentity::AdsbIcao,
            1 => TargetIdentity::AdsbSelfAssigned,
            2 => TargetIdentity::TisbIcao,
            3 => TargetIdentity::TisbTrackFile,
            4 => TargetIdentity::SurfaceVehicle,
            5 => TargetIdentity::GroundStationBeacon,
            r => TargetIdentity::Reserved(r),
        }
    }
}

/// Airborne/ground bit from the misc nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AirGroundState {
    OnGround,
    Airborne,
}

impl AirGroundState {
    fn from_bit(bit: u8) -> AirGroundState {
        if bit & 0x01 == 0 {
            AirGroundState::OnGround
        } else {
            AirGroundState::Airborne
        }
    }
}

/// Whether the report position is fresh or extrapolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportUpdate {
    Updated,
    Extrapolated,
}

impl ReportUpdate {
    fn from_bit(bit: u8) -> ReportUpdate {
        if bit & 0x01 == 0 {
            ReportUpdate::Updated
        } else {
            ReportUpdate::Extrapolated
        }
    }
}

/// Meaning of the heading byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeadingType {
    NotValid,
    TrueTrackAngle,
    MagneticHeading,
    TrueHeading,
}

impl HeadingType {
    fn from_bits(bits: u8) -> HeadingType {
        match bits & 0x03 {
            0 => HeadingType::NotValid,
            1 => HeadingType::TrueTrackAngle,
            2 => HeadingType::MagneticHeading,
            _ => HeadingType::TrueHeading,
        }
    }
}

/// Emergency/priority code from the final nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriorityCode {
    NoEmergency,
    GeneralEmergency,
    MedicalEmergency,
    MinimumFuel,
    NoCommunication,
    UnlawfulInterference,
    DownedAircraft,
    Reserved(u8),
}

impl PriorityCode {
    pub fn from_nibble(nibble: u8) -> PriorityCode {
        match nibble & 0x0F {
            0 => PriorityCode::NoEmergency,
            1 => PriorityCode::GeneralEmergency,
            2 => PriorityCode::MedicalEmergency,
            3 => PriorityCode::MinimumFuel,
            4 => PriorityCode::NoCommunication,
            5 => PriorityCode::UnlawfulInterference,
            6 => PriorityCode::DownedAircraft,
            r => PriorityCode::Reserved(r),
        }
    }
}

// ---------------------------------------------------------------------------
// Category description tables
// ---------------------------------------------------------------------------

/// Containment radius bucket for a Navigation Integrity Category value.
pub fn nic_description(nic: u8) -> &'static str {
    match nic {
        0 => "unknown",
        1 => "< 20.0 NM",
        2 => "< 8.0 NM",
        3 => "< 4.0 NM",
        4 => "< 2.0 NM",
        5 => "< 1.0 NM",
        6 => "< 0.6 NM",
        7 => "< 0.2 NM",
        8 => "< 0.1 NM",
        9 => "HPL < 75 m, VPL < 112 m",
        10 => "HPL < 25 m, VPL < 37.5 m",
        11 => "HPL < 7.5 m, VPL < 11 m",
        _ => "unused",
    }
}

/// Estimated position uncertainty bucket for a Navigation Accuracy
/// Category (position) value.
pub fn nacp_description(nacp: u8) -> &'static str {
    match nacp {
        0 => "unknown",
        1 => "< 10.0 NM",
        2 => "< 4.0 NM",
        3 => "< 2.0 NM",
        4 => "< 1.0 NM",
        5 => "< 0.5 NM",
        6 => "< 0.3 NM",
        7 => "< 0.1 NM",
        8 => "< 0.05 NM",
        9 => "HFOM < 30 m, VFOM < 45 m",
        10 => "HFOM < 10 m, VFOM < 15 m",
        11 => "HFOM < 3 m, VFOM < 4 m",
        _ => "unused",
    }
}

/// Human-readable emitter category.
pub fn emitter_category_description(code: u8) -> &'static str {
    match code {
        0 => "no aircraft type information",
        1 => "light",
        2 => "small",
        3 => "large",
        4 => "high vortex large",
        5 => "heavy",
        6 => "highly maneuverable",
        7 => "rotorcraft",
        9 => "glider/sailplane",
        10 => "lighter than air",
        11 => "parachutist/sky diver",
        12 => "ultra light/hang glider/paraglider",
        14 => "unmanned aerial vehicle",
        15 => "space/transatmospheric vehicle",
        17 => "surface emergency vehicle",
        18 => "surface service vehicle",
        19 => "point obstacle",
        20 => "cluster obstacle",
        21 => "line obstacle",
        8 | 13 | 16 => "unassigned",
        _ => "reserved",
    }
}

// ---------------------------------------------------------------------------
// Traffic report
// ---------------------------------------------------------------------------

/// One decoded traffic target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficReport {
    pub alert_status: TrafficAlertStatus,
    pub address_type: TargetIdentity,
    /// 24-bit participant (ICAO) address.
    pub participant_address: u32,
    /// Degrees, north positive.
    pub latitude: f64,
    /// Degrees, east positive.
    pub longitude: f64,
    /// Pressure altitude in feet, 25 ft resolution offset by -1000 ft;
    /// `None` when the report carries no altitude data.
    pub altitude_ft: Option<i32>,
    pub air_ground: AirGroundState,
    pub report_update: ReportUpdate,
    pub heading_type: HeadingType,
    /// Navigation Integrity Category; see [`nic_description`].
    pub nic: u8,
    /// Navigation Accuracy Category for position; see
    /// [`nacp_description`].
    pub nacp: u8,
    /// Knots; `None` when not available.
    pub horizontal_velocity_kt: Option<u16>,
    /// Feet per minute, positive up, 64 fpm resolution; `None` when not
    /// available.
    pub vertical_velocity_fpm: Option<i32>,
    /// Degrees; meaning given by `heading_type`.
    pub heading_deg: f64,
    /// Emitter category code; see [`emitter_category_description`].
    pub emitter_category: u8,
    /// Callsign with trailing padding removed.
    pub callsign: String,
    pub priority_code: PriorityCode,
}

impl TrafficReport {
    /// Decode the field bytes. `None` when the CRC failed or the length
    /// is off; the fields stay not-set.
    pub(crate) fn decode(fields: &[u8], crc_valid: bool) -> Option<TrafficReport> {
        if !crc_valid {
            return None;
        }
        if fields.len() != TRAFFIC_REPORT_LEN {
            warn!(
                expected = TRAFFIC_REPORT_LEN,
                actual = fields.len(),
                "unexpected traffic report length, skipping field decode"
            );
            return None;
        }

        let status = fields[0];
        let participant_address =
            u32::from(fields[1]) << 16 | u32::from(fields[2]) << 8 | u32::from(fields[3]);

        let latitude = angular_from_bytes(fields[4], fields[5], fields[6]);
        let longitude = angular_from_bytes(fields[7], fields[8], fields[9]);

        let alt_raw = u16::from(fields[10]) << 4 | u16::from(fields[11] >> 4);
        let altitude_ft = if alt_raw == ALTITUDE_UNAVAILABLE {
            None
        } else {
            Some(i32::from(alt_raw) * 25 - 1000)
        };

        let misc = fields[11] & 0x0F;

        let hvel_raw = u16::from(fields[13]) << 4 | u16::from(fields[14] >> 4);
        let horizontal_velocity_kt = if hvel_raw == HVEL_UNAVAILABLE {
            None
        } else {
            Some(hvel_raw)
        };

        let vvel_raw = u16::from(fields[14] & 0x0F) << 8 | u16::from(fields[15]);
        let vertical_velocity_fpm = if vvel_raw == VVEL_UNAVAILABLE {
            None
        } else {
            Some(i32::from(sign_extend_12(vvel_raw)) * 64)
        };

        let callsign = String::from_utf8_lossy(&fields[18..26])
            .trim_end()
            .to_string();

        Some(TrafficReport {
            alert_status: TrafficAlertStatus::from_nibble(status >> 4),
            address_type: TargetIdentity::from_nibble(status & 0x0F),
            participant_address,
            latitude,
            longitude,
            altitude_ft,
            air_ground: AirGroundState::from_bit(misc >> 3),
            report_update: ReportUpdate::from_bit(misc >> 2),
            heading_type: HeadingType::from_bits(misc),
            nic: fields[12] >> 4,
            nacp: fields[12] & 0x0F,
            horizontal_velocity_kt,
            vertical_velocity_fpm,
            heading_deg: f64::from(fields[16]) * HEADING_RESOLUTION,
            emitter_category: fields[17],
            callsign,
            priority_code: PriorityCode::from_nibble(fields[26] >> 4),
        })
    }
}

/// Decode a 24-bit signed angular fraction (MS byte first) into degrees.
fn angular_from_bytes(b0: u8, b1: u8, b2: u8) -> f64 {
    let raw = u32::from(b0) << 16 | u32::from(b1) << 8 | u32::from(b2);
    let signed = ((raw << 8) as i32) >> 8;
    f64::from(signed) * ANGULAR_RESOLUTION
}

/// Sign-extend a 12-bit two's-complement value.
fn sign_extend_12(raw: u16) -> i16 {
    ((raw << 4) as i16) >> 4
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Field bytes of the worked example from the interface document
    /// (type byte stripped).
    const EXAMPLE: [u8; 27] = [
        0x00, 0xAB, 0x45, 0x49, 0x1F, 0xEF, 0x15, 0xA8, 0x89, 0x78, 0x0F, 0x09, 0xA9, 0x07, 0xB0,
        0x01, 0x20, 0x01, 0x4E, 0x38, 0x32, 0x35, 0x56, 0x20, 0x20, 0x20, 0x00,
    ];

    fn decode_example() -> TrafficReport {
        TrafficReport::decode(&EXAMPLE, true).expect("example should decode")
    }

    // -- Worked example --

    #[test]
    fn test_example_identity() {
        let report = decode_example();
        assert_eq!(report.alert_status, TrafficAlertStatus::NoAlert);
        assert_eq!(report.address_type, TargetIdentity::AdsbIcao);
        assert_eq!(report.participant_address, 0xAB4549);
        assert_eq!(report.callsign, "N825V");
        assert_eq!(report.emitter_category, 1); // light
        assert_eq!(report.priority_code, PriorityCode::NoEmergency);
    }

    #[test]
    fn test_example_position() {
        let report = decode_example();
        assert!((report.latitude - 44.90708).abs() < 1e-4);
        assert!((report.longitude - -122.99488).abs() < 1e-4);
        assert_eq!(report.altitude_ft, Some(5000));
    }

    #[test]
    fn test_example_kinematics() {
        let report = decode_example();
        assert_eq!(report.horizontal_velocity_kt, Some(123));
        assert_eq!(report.vertical_velocity_fpm, Some(64));
        assert!((report.heading_deg - 45.0).abs() < f64::EPSILON);
        assert_eq!(report.heading_type, HeadingType::TrueTrackAngle);
        assert_eq!(report.air_ground, AirGroundState::Airborne);
        assert_eq!(report.report_update, ReportUpdate::Updated);
    }

    #[test]
    fn test_example_integrity_categories() {
        let report = decode_example();
        assert_eq!(report.nic, 10);
        assert_eq!(report.nacp, 9);
        assert_eq!(nic_description(report.nic), "HPL < 25 m, VPL < 37.5 m");
        assert_eq!(nacp_description(report.nacp), "HFOM < 30 m, VFOM < 45 m");
    }

    // -- Sentinels --

    #[test]
    fn test_altitude_unavailable_sentinel() {
        let mut fields = EXAMPLE;
        fields[10] = 0xFF;
        fields[11] |= 0xF0; // altitude bits all set, misc nibble untouched
        let report = TrafficReport::decode(&fields, true).unwrap();
        assert_eq!(report.altitude_ft, None);
        assert_eq!(report.air_ground, AirGroundState::Airborne);
    }

    #[test]
    fn test_altitude_extremes() {
        let mut fields = EXAMPLE;
        fields[10] = 0x00;
        fields[11] &= 0x0F;
        let report = TrafficReport::decode(&fields, true).unwrap();
        assert_eq!(report.altitude_ft, Some(-1000));

        fields[10] = 0xFF;
        fields[11] = (0xE << 4) | (EXAMPLE[11] & 0x0F); // 0xFFE, highest real value
        let report = TrafficReport::decode(&fields, true).unwrap();
        assert_eq!(report.altitude_ft, Some(0xFFE * 25 - 1000));
    }

    #[test]
    fn test_horizontal_velocity_unavailable_sentinel() {
        let mut fields = EXAMPLE;
        fields[13] = 0xFF;
        fields[14] |= 0xF0;
        let report = TrafficReport::decode(&fields, true).unwrap();
        assert_eq!(report.horizontal_velocity_kt, None);
    }

    #[test]
    fn test_vertical_velocity_unavailable_sentinel() {
        let mut fields = EXAMPLE;
        fields[14] = (fields[14] & 0xF0) | 0x08;
        fields[15] = 0x00; // raw 0x800
        let report = TrafficReport::decode(&fields, true).unwrap();
        assert_eq!(report.vertical_velocity_fpm, None);
    }

    #[test]
    fn test_vertical_velocity_descent() {
        // Raw 0xFFF = -1 unit = 64 fpm down.
        let mut fields = EXAMPLE;
        fields[14] |= 0x0F;
        fields[15] = 0xFF;
        let report = TrafficReport::decode(&fields, true).unwrap();
        assert_eq!(report.vertical_velocity_fpm, Some(-64));
    }

    #[test]
    fn test_southern_western_hemisphere() {
        // Negate the example's latitude fraction: raw 0x1FEF15 -> two's
        // complement 0xE010EB.
        let mut fields = EXAMPLE;
        fields[4] = 0xE0;
        fields[5] = 0x10;
        fields[6] = 0xEB;
        let report = TrafficReport::decode(&fields, true).unwrap();
        assert!((report.latitude + 44.90708).abs() < 1e-4);
        assert!(report.longitude < 0.0);
    }

    // -- Skip conditions --

    #[test]
    fn test_invalid_crc_skips_decode() {
        assert_eq!(TrafficReport::decode(&EXAMPLE, false), None);
    }

    #[test]
    fn test_wrong_length_skips_decode() {
        assert_eq!(TrafficReport::decode(&EXAMPLE[..26], true), None);
        assert_eq!(TrafficReport::decode(&[0u8; 28], true), None);
    }

    // -- Enums and tables --

    #[test]
    fn test_alert_status_nibbles() {
        assert_eq!(TrafficAlertStatus::from_nibble(0), TrafficAlertStatus::NoAlert);
        assert_eq!(
            TrafficAlertStatus::from_nibble(1),
            TrafficAlertStatus::TrafficAlert
        );
        assert_eq!(
            TrafficAlertStatus::from_nibble(9),
            TrafficAlertStatus::Reserved(9)
        );
    }

    #[test]
    fn test_target_identity_nibbles() {
        assert_eq!(TargetIdentity::from_nibble(0), TargetIdentity::AdsbIcao);
        assert_eq!(TargetIdentity::from_nibble(4), TargetIdentity::SurfaceVehicle);
        assert_eq!(TargetIdentity::from_nibble(15), TargetIdentity::Reserved(15));
    }

    #[test]
    fn test_heading_type_bits() {
        assert_eq!(HeadingType::from_bits(0), HeadingType::NotValid);
        assert_eq!(HeadingType::from_bits(1), HeadingType::TrueTrackAngle);
        assert_eq!(HeadingType::from_bits(2), HeadingType::MagneticHeading);
        assert_eq!(HeadingType::from_bits(3), HeadingType::TrueHeading);
    }

    #[test]
    fn test_priority_code_nibbles() {
        assert_eq!(PriorityCode::from_nibble(0), PriorityCode::NoEmergency);
        assert_eq!(PriorityCode::from_nibble(5), PriorityCode::UnlawfulInterference);
        assert_eq!(PriorityCode::from_nibble(12), PriorityCode::Reserved(12));
    }

    #[test]
    fn test_emitter_descriptions() {
        assert_eq!(emitter_category_description(1), "light");
        assert_eq!(emitter_category_description(7), "rotorcraft");
        assert_eq!(emitter_category_description(13), "unassigned");
        assert_eq!(emitter_category_description(39), "reserved");
    }

    #[test]
    fn test_sign_extend_12() {
        assert_eq!(sign_extend_12(0x000), 0);
        assert_eq!(sign_extend_12(0x001), 1);
        assert_eq!(sign_extend_12(0x7FF), 2047);
        assert_eq!(sign_extend_12(0xFFF), -1);
        assert_eq!(sign_extend_12(0x801), -2047);
    }

    #[test]
    fn test_callsign_trailing_padding_trimmed() {
        let mut fields = EXAMPLE;
        fields[18..26].copy_from_slice(b"AB      ");
        let report = TrafficReport::decode(&fields, true).unwrap();
        assert_eq!(report.callsign, "AB");
    }
}
