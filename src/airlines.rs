// IATA airline designators for display
const AIRLINE_NAMES: &[(&str, &str)] = &[
    ("5O", "ASL Airlines France"),
    ("6E", "IndiGo"),
    ("AA", "American Airlines"),
    ("AC", "Air Canada"),
    ("AF", "Air France"),
    ("AH", "Air Algerie"),
    ("AT", "Royal Air Maroc"),
    ("AY", "Finnair"),
    ("AZ", "ITA Airways"),
    ("BA", "British Airways"),
    ("BJ", "Nouvelair"),
    ("DL", "Delta Air Lines"),
    ("EK", "Emirates"),
    ("EY", "Etihad Airways"),
    ("FR", "Ryanair"),
    ("IB", "Iberia"),
    ("KL", "KLM Royal Dutch Airlines"),
    ("LH", "Lufthansa"),
    ("LX", "Swiss International Air Lines"),
    ("MS", "EgyptAir"),
    ("OS", "Austrian Airlines"),
    ("PC", "Pegasus Airlines"),
    ("QR", "Qatar Airways"),
    ("SN", "Brussels Airlines"),
    ("SQ", "Singapore Airlines"),
    ("SS", "Corsair International"),
    ("TK", "Turkish Airlines"),
    ("TO", "Transavia France"),
    ("TP", "TAP Air Portugal"),
    ("TU", "Tunisair"),
    ("U2", "easyJet"),
    ("UA", "United Airlines"),
    ("UX", "Air Europa"),
    ("V7", "Volotea"),
    ("VY", "Vueling"),
    ("W6", "Wizz Air"),
];

/// Display name for an airline code, or the code itself when unknown.
pub fn airline_name(code: &str) -> &str {
    AIRLINE_NAMES
        .binary_search_by(|(known, _)| known.cmp(&code))
        .map(|index| AIRLINE_NAMES[index].1)
        .unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted_for_binary_search() {
        assert!(AIRLINE_NAMES.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn test_known_and_unknown_codes() {
        assert_eq!(airline_name("AF"), "Air France");
        assert_eq!(airline_name("5O"), "ASL Airlines France");
        assert_eq!(airline_name("ZZ"), "ZZ");
    }
}
