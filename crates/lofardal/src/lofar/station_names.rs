//! Conversion between LOFAR station names and numeric station ids.

use crate::error::{Error, Result};

/// Known stations by id, from the station static metadata.
const STATIONS: &[(u32, &str)] = &[
    (1, "CS001"),
    (2, "CS002"),
    (3, "CS003"),
    (4, "CS004"),
    (5, "CS005"),
    (6, "CS006"),
    (7, "CS007"),
    (8, "CS008"),
    (9, "CS009"),
    (10, "CS010"),
    (11, "CS011"),
    (12, "CS012"),
    (13, "CS013"),
    (14, "CS014"),
    (15, "CS015"),
    (16, "CS016"),
    (17, "CS017"),
    (18, "CS018"),
    (19, "CS019"),
    (20, "CS020"),
    (21, "CS021"),
    (22, "CS022"),
    (23, "CS023"),
    (24, "CS024"),
    (25, "CS025"),
    (26, "CS026"),
    (27, "CS027"),
    (28, "CS028"),
    (29, "CS029"),
    (30, "CS030"),
    (31, "CS031"),
    (32, "CS032"),
    (101, "CS101"),
    (102, "CS102"),
    (103, "CS103"),
    (104, "RS104"),
    (105, "RS105"),
    (106, "RS106"),
    (107, "RS107"),
    (108, "RS108"),
    (109, "RS109"),
    (121, "CS201"),
    (122, "RS202"),
    (123, "RS203"),
    (124, "RS204"),
    (125, "RS205"),
    (126, "RS206"),
    (127, "RS207"),
    (128, "RS208"),
    (129, "RS209"),
    (130, "RS210"),
    (141, "CS301"),
    (142, "CS302"),
    (143, "RS303"),
    (144, "RS304"),
    (145, "RS305"),
    (146, "RS306"),
    (147, "RS307"),
    (148, "RS308"),
    (149, "RS309"),
    (150, "RS310"),
    (161, "CS401"),
    (162, "RS402"),
    (163, "RS403"),
    (164, "RS404"),
    (165, "RS405"),
    (166, "RS406"),
    (167, "RS407"),
    (168, "RS408"),
    (169, "RS409"),
    (170, "RS410"),
    (171, "RS411"),
    (172, "RS412"),
    (173, "RS413"),
    (181, "CS501"),
    (182, "RS502"),
    (183, "RS503"),
    (184, "RS504"),
    (185, "RS505"),
    (186, "RS506"),
    (187, "RS507"),
    (188, "RS508"),
    (189, "RS509"),
    (201, "DE601"),
    (202, "DE602"),
    (203, "DE603"),
    (204, "DE604"),
    (205, "DE605"),
    (206, "FR606"),
    (207, "SE607"),
    (208, "UK608"),
    (209, "DE609"),
    (210, "PL610"),
    (211, "PL611"),
    (212, "PL612"),
    // test system and non-ILT stations with arbitrary ids
    (230, "CS100"),
    (901, "FI609"),
];

/// Name of station `id`, or `ST<id>` for unknown ids.
pub fn station_id_to_name(id: u32) -> String {
    STATIONS
        .iter()
        .find(|(sid, _)| *sid == id)
        .map_or_else(|| format!("ST{id:03}"), |(_, name)| (*name).to_string())
}

/// Id of the station called `name`.
///
/// The three digits after the two-letter field prefix give the id; ids
/// above 200 fold down by 80 per hundred. Unknown names with a valid number
/// are accepted.
pub fn station_name_to_id(name: &str) -> Result<u32> {
    match name {
        "CS100" => return Ok(230),
        "FI609" | "KAIRA" => return Ok(901),
        _ => {}
    }
    let invalid = || Error::InvalidStationName(name.to_string());
    if name.len() < 5 {
        return Err(invalid());
    }
    let digits: String = name
        .get(2..)
        .ok_or_else(invalid)?
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    let id: u32 = digits.parse().map_err(|_| invalid())?;
    if id > 999 {
        return Err(invalid());
    }
    let fold = id.saturating_sub(101) / 100;
    Ok(id - fold * 80)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids() {
        assert_eq!(station_id_to_name(1), "CS001");
        assert_eq!(station_id_to_name(121), "CS201");
        assert_eq!(station_id_to_name(201), "DE601");
        assert_eq!(station_id_to_name(901), "FI609");
    }

    #[test]
    fn unknown_id_falls_back() {
        assert_eq!(station_id_to_name(77), "ST077");
        assert_eq!(station_id_to_name(1234), "ST1234");
    }

    #[test]
    fn names_fold_to_ids() {
        assert_eq!(station_name_to_id("CS001").unwrap(), 1);
        assert_eq!(station_name_to_id("RS106").unwrap(), 106);
        assert_eq!(station_name_to_id("CS201").unwrap(), 121);
        assert_eq!(station_name_to_id("RS509").unwrap(), 189);
        assert_eq!(station_name_to_id("DE601").unwrap(), 201);
        assert_eq!(station_name_to_id("PL612").unwrap(), 212);
        assert_eq!(station_name_to_id("CS100").unwrap(), 230);
        assert_eq!(station_name_to_id("KAIRA").unwrap(), 901);
    }

    #[test]
    fn table_roundtrips_through_the_fold_rule() {
        for &(id, name) in STATIONS {
            assert_eq!(station_name_to_id(name).unwrap(), id, "{name}");
        }
    }

    #[test]
    fn bad_names() {
        assert!(matches!(
            station_name_to_id("CS1"),
            Err(Error::InvalidStationName(_))
        ));
        assert!(station_name_to_id("CS1000").is_err());
        assert!(station_name_to_id("CSXYZ").is_err());
    }
}
