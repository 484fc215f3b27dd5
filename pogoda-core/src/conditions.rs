//! WMO weather code descriptions (Polish).
//! See: https://open-meteo.com/en/docs#weathervariables

/// Description used for codes missing from the table.
pub const UNKNOWN_DESCRIPTION: &str = "Nieznane";

/// Looks up the description for a known code.
pub fn lookup(code: i64) -> Option<&'static str> {
    let text = match code {
        0 => "Bezchmurnie",
        1 => "Głównie bezchmurnie",
        2 => "Częściowe zachmurzenie",
        3 => "Pochmurno",
        45 => "Mgła",
        48 => "Szadź",
        51 => "Lekka mżawka",
        53 => "Umiarkowana mżawka",
        55 => "Gęsta mżawka",
        61 => "Lekki deszcz",
        63 => "Umiarkowany deszcz",
        65 => "Silny deszcz",
        71 => "Lekki śnieg",
        73 => "Umiarkowany śnieg",
        75 => "Silny śnieg",
        80 => "Przelotne opady",
        81 => "Umiarkowane przelotne opady",
        82 => "Silne przelotne opady",
        95 => "Burza",
        96 => "Burza z gradem",
        99 => "Silna burza z gradem",
        _ => return None,
    };
    Some(text)
}

/// Like [`lookup`], falling back to [`UNKNOWN_DESCRIPTION`] for unmapped or
/// missing codes.
pub fn describe(code: Option<i64>) -> &'static str {
    code.and_then(lookup).unwrap_or(UNKNOWN_DESCRIPTION)
}
