use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
    pub continent: &'static str,
    pub continent_code: &'static str,
}

impl Country {
    const fn new(
        code: &'static str,
        name: &'static str,
        continent: &'static str,
        continent_code: &'static str,
    ) -> Self {
        Self { code, name, continent, continent_code }
    }
}

static COUNTRIES: &[Country] = &[
    Country::new("AF", "Afghanistan", "Asia", "AS"),
    Country::new("AL", "Albania", "Europe", "EU"),
    Country::new("DZ", "Algeria", "Africa", "AF"),
    Country::new("AO", "Angola", "Africa", "AF"),
    Country::new("AR", "Argentina", "South America", "SA"),
    Country::new("AM", "Armenia", "Asia", "AS"),
    Country::new("AU", "Australia", "Oceania", "OC"),
    Country::new("AT", "Austria", "Europe", "EU"),
    Country::new("AZ", "Azerbaijan", "Asia", "AS"),
    Country::new("BD", "Bangladesh", "Asia", "AS"),
    Country::new("BY", "Belarus", "Europe", "EU"),
    Country::new("BE", "Belgium", "Europe", "EU"),
    Country::new("BJ", "Benin", "Africa", "AF"),
    Country::new("BT", "Bhutan", "Asia", "AS"),
    Country::new("BO", "Bolivia", "South America", "SA"),
    Country::new("BA", "Bosnia and Herzegovina", "Europe", "EU"),
    Country::new("BW", "Botswana", "Africa", "AF"),
    Country::new("BR", "Brazil", "South America", "SA"),
    Country::new("BG", "Bulgaria", "Europe", "EU"),
    Country::new("BF", "Burkina Faso", "Africa", "AF"),
    Country::new("KH", "Cambodia", "Asia", "AS"),
    Country::new("CM", "Cameroon", "Africa", "AF"),
    Country::new("CA", "Canada", "North America", "NA"),
    Country::new("CL", "Chile", "South America", "SA"),
    Country::new("CN", "China", "Asia", "AS"),
    Country::new("CO", "Colombia", "South America", "SA"),
    Country::new("CR", "Costa Rica", "North America", "NA"),
    Country::new("HR", "Croatia", "Europe", "EU"),
    Country::new("CU", "Cuba", "North America", "NA"),
    Country::new("CY", "Cyprus", "Asia", "AS"),
    Country::new("CZ", "Czechia", "Europe", "EU"),
    Country::new("CD", "Democratic Republic of the Congo", "Africa", "AF"),
    Country::new("DK", "Denmark", "Europe", "EU"),
    Country::new("DO", "Dominican Republic", "North America", "NA"),
    Country::new("EC", "Ecuador", "South America", "SA"),
    Country::new("EG", "Egypt", "Africa", "AF"),
    Country::new("SV", "El Salvador", "North America", "NA"),
    Country::new("EE", "Estonia", "Europe", "EU"),
    Country::new("ET", "Ethiopia", "Africa", "AF"),
    Country::new("FJ", "Fiji", "Oceania", "OC"),
    Country::new("FI", "Finland", "Europe", "EU"),
    Country::new("FR", "France", "Europe", "EU"),
    Country::new("GA", "Gabon", "Africa", "AF"),
    Country::new("GE", "Georgia", "Asia", "AS"),
    Country::new("DE", "Germany", "Europe", "EU"),
    Country::new("GH", "Ghana", "Africa", "AF"),
    Country::new("GR", "Greece", "Europe", "EU"),
    Country::new("GT", "Guatemala", "North America", "NA"),
    Country::new("HN", "Honduras", "North America", "NA"),
    Country::new("HU", "Hungary", "Europe", "EU"),
    Country::new("IS", "Iceland", "Europe", "EU"),
    Country::new("IN", "India", "Asia", "AS"),
    Country::new("ID", "Indonesia", "Asia", "AS"),
    Country::new("IR", "Iran", "Asia", "AS"),
    Country::new("IQ", "Iraq", "Asia", "AS"),
    Country::new("IE", "Ireland", "Europe", "EU"),
    Country::new("IL", "Israel", "Asia", "AS"),
    Country::new("IT", "Italy", "Europe", "EU"),
    Country::new("JM", "Jamaica", "North America", "NA"),
    Country::new("JP", "Japan", "Asia", "AS"),
    Country::new("JO", "Jordan", "Asia", "AS"),
    Country::new("KZ", "Kazakhstan", "Asia", "AS"),
    Country::new("KE", "Kenya", "Africa", "AF"),
    Country::new("KR", "South Korea", "Asia", "AS"),
    Country::new("KW", "Kuwait", "Asia", "AS"),
    Country::new("LA", "Laos", "Asia", "AS"),
    Country::new("LV", "Latvia", "Europe", "EU"),
    Country::new("LB", "Lebanon", "Asia", "AS"),
    Country::new("LT", "Lithuania", "Europe", "EU"),
    Country::new("LU", "Luxembourg", "Europe", "EU"),
    Country::new("MG", "Madagascar", "Africa", "AF"),
    Country::new("MW", "Malawi", "Africa", "AF"),
    Country::new("MY", "Malaysia", "Asia", "AS"),
    Country::new("ML", "Mali", "Africa", "AF"),
    Country::new("MT", "Malta", "Europe", "EU"),
    Country::new("MX", "Mexico", "North America", "NA"),
    Country::new("MD", "Moldova", "Europe", "EU"),
    Country::new("MN", "Mongolia", "Asia", "AS"),
    Country::new("ME", "Montenegro", "Europe", "EU"),
    Country::new("MA", "Morocco", "Africa", "AF"),
    Country::new("MZ", "Mozambique", "Africa", "AF"),
    Country::new("MM", "Myanmar", "Asia", "AS"),
    Country::new("NA", "Namibia", "Africa", "AF"),
    Country::new("NP", "Nepal", "Asia", "AS"),
    Country::new("NL", "Netherlands", "Europe", "EU"),
    Country::new("NZ", "New Zealand", "Oceania", "OC"),
    Country::new("NI", "Nicaragua", "North America", "NA"),
    Country::new("NE", "Niger", "Africa", "AF"),
    Country::new("NG", "Nigeria", "Africa", "AF"),
    Country::new("MK", "North Macedonia", "Europe", "EU"),
    Country::new("NO", "Norway", "Europe", "EU"),
    Country::new("OM", "Oman", "Asia", "AS"),
    Country::new("PK", "Pakistan", "Asia", "AS"),
    Country::new("PA", "Panama", "North America", "NA"),
    Country::new("PG", "Papua New Guinea", "Oceania", "OC"),
    Country::new("PY", "Paraguay", "South America", "SA"),
    Country::new("PE", "Peru", "South America", "SA"),
    Country::new("PH", "Philippines", "Asia", "AS"),
    Country::new("PL", "Poland", "Europe", "EU"),
    Country::new("PT", "Portugal", "Europe", "EU"),
    Country::new("QA", "Qatar", "Asia", "AS"),
    Country::new("RO", "Romania", "Europe", "EU"),
    Country::new("RU", "Russia", "Europe", "EU"),
    Country::new("RW", "Rwanda", "Africa", "AF"),
    Country::new("SA", "Saudi Arabia", "Asia", "AS"),
    Country::new("SN", "Senegal", "Africa", "AF"),
    Country::new("RS", "Serbia", "Europe", "EU"),
    Country::new("SG", "Singapore", "Asia", "AS"),
    Country::new("SK", "Slovakia", "Europe", "EU"),
    Country::new("SI", "Slovenia", "Europe", "EU"),
    Country::new("ZA", "South Africa", "Africa", "AF"),
    Country::new("ES", "Spain", "Europe", "EU"),
    Country::new("LK", "Sri Lanka", "Asia", "AS"),
    Country::new("SD", "Sudan", "Africa", "AF"),
    Country::new("SE", "Sweden", "Europe", "EU"),
    Country::new("CH", "Switzerland", "Europe", "EU"),
    Country::new("SY", "Syria", "Asia", "AS"),
    Country::new("TW", "Taiwan", "Asia", "AS"),
    Country::new("TZ", "Tanzania", "Africa", "AF"),
    Country::new("TH", "Thailand", "Asia", "AS"),
    Country::new("TN", "Tunisia", "Africa", "AF"),
    Country::new("TR", "Turkey", "Asia", "AS"),
    Country::new("UG", "Uganda", "Africa", "AF"),
    Country::new("UA", "Ukraine", "Europe", "EU"),
    Country::new("AE", "United Arab Emirates", "Asia", "AS"),
    Country::new("GB", "United Kingdom", "Europe", "EU"),
    Country::new("US", "United States", "North America", "NA"),
    Country::new("UY", "Uruguay", "South America", "SA"),
    Country::new("UZ", "Uzbekistan", "Asia", "AS"),
    Country::new("VE", "Venezuela", "South America", "SA"),
    Country::new("VN", "Vietnam", "Asia", "AS"),
    Country::new("YE", "Yemen", "Asia", "AS"),
    Country::new("ZM", "Zambia", "Africa", "AF"),
    Country::new("ZW", "Zimbabwe", "Africa", "AF"),
];

pub fn all() -> &'static [Country] {
    COUNTRIES
}

/// Case-insensitive lookup by ISO alpha-2 code.
pub fn find(code: &str) -> Option<&'static Country> {
    let code = code.trim();
    COUNTRIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

/// GBIF expects upper-case ISO codes.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

pub fn by_continent() -> Vec<(&'static str, Vec<&'static Country>)> {
    let mut grouped: BTreeMap<&'static str, Vec<&'static Country>> = BTreeMap::new();
    for country in COUNTRIES {
        grouped.entry(country.continent).or_default().push(country);
    }

    grouped
        .into_iter()
        .map(|(continent, mut countries)| {
            countries.sort_by_key(|c| c.name);
            (continent, countries)
        })
        .collect()
}
