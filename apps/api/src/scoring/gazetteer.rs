//! Gazetteer — the lookup tables behind location resolution.
//!
//! Small and static on purpose: countries with their common names and ISO
//! codes, major cities with their country, and US states (so `Austin, TX` does
//! not resolve to a country code).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Europe,
    NorthAmerica,
    SouthAmerica,
    Asia,
    MiddleEast,
    Africa,
    Oceania,
}

#[derive(Debug, Clone)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
    pub region: Region,
}

#[derive(Debug, Clone)]
pub struct City {
    pub name: &'static str,
    pub country_code: &'static str,
}

/// (ISO alpha-2, name, extra spellings incl. alpha-3, region)
const COUNTRIES: &[(&str, &str, &[&str], Region)] = &[
    ("US", "United States", &["usa", "united states of america", "america", "u.s.", "u.s.a."], Region::NorthAmerica),
    ("CA", "Canada", &["can"], Region::NorthAmerica),
    ("MX", "Mexico", &["mex"], Region::NorthAmerica),
    ("BR", "Brazil", &["brasil", "bra"], Region::SouthAmerica),
    ("AR", "Argentina", &["arg"], Region::SouthAmerica),
    ("CL", "Chile", &["chl"], Region::SouthAmerica),
    ("CO", "Colombia", &["col"], Region::SouthAmerica),
    ("PE", "Peru", &["per"], Region::SouthAmerica),
    ("GB", "United Kingdom", &["uk", "u.k.", "gbr", "great britain", "britain", "england", "scotland", "wales"], Region::Europe),
    ("IE", "Ireland", &["irl"], Region::Europe),
    ("DE", "Germany", &["deu", "deutschland"], Region::Europe),
    ("FR", "France", &["fra"], Region::Europe),
    ("ES", "Spain", &["esp", "espana"], Region::Europe),
    ("PT", "Portugal", &["prt"], Region::Europe),
    ("IT", "Italy", &["ita", "italia"], Region::Europe),
    ("NL", "Netherlands", &["nld", "the netherlands", "holland"], Region::Europe),
    ("BE", "Belgium", &["bel"], Region::Europe),
    ("LU", "Luxembourg", &["lux"], Region::Europe),
    ("CH", "Switzerland", &["che", "schweiz", "suisse"], Region::Europe),
    ("AT", "Austria", &["aut", "osterreich"], Region::Europe),
    ("DK", "Denmark", &["dnk"], Region::Europe),
    ("SE", "Sweden", &["swe"], Region::Europe),
    ("NO", "Norway", &["nor"], Region::Europe),
    ("FI", "Finland", &["fin"], Region::Europe),
    ("PL", "Poland", &["pol", "polska"], Region::Europe),
    ("CZ", "Czech Republic", &["cze", "czechia"], Region::Europe),
    ("HU", "Hungary", &["hun"], Region::Europe),
    ("RO", "Romania", &["rou"], Region::Europe),
    ("GR", "Greece", &["grc"], Region::Europe),
    ("UA", "Ukraine", &["ukr"], Region::Europe),
    ("EE", "Estonia", &["est"], Region::Europe),
    ("TR", "Turkey", &["tur", "turkiye"], Region::MiddleEast),
    ("IL", "Israel", &["isr"], Region::MiddleEast),
    ("AE", "United Arab Emirates", &["uae", "are", "emirates"], Region::MiddleEast),
    ("SA", "Saudi Arabia", &["sau", "ksa"], Region::MiddleEast),
    ("QA", "Qatar", &["qat"], Region::MiddleEast),
    ("EG", "Egypt", &["egy"], Region::Africa),
    ("NG", "Nigeria", &["nga"], Region::Africa),
    ("KE", "Kenya", &["ken"], Region::Africa),
    ("ZA", "South Africa", &["zaf", "rsa"], Region::Africa),
    ("MA", "Morocco", &["mar"], Region::Africa),
    ("IN", "India", &["ind", "bharat"], Region::Asia),
    ("PK", "Pakistan", &["pak"], Region::Asia),
    ("BD", "Bangladesh", &["bgd"], Region::Asia),
    ("CN", "China", &["chn", "prc"], Region::Asia),
    ("HK", "Hong Kong", &["hkg"], Region::Asia),
    ("TW", "Taiwan", &["twn"], Region::Asia),
    ("JP", "Japan", &["jpn", "nippon"], Region::Asia),
    ("KR", "South Korea", &["kor", "korea", "republic of korea"], Region::Asia),
    ("SG", "Singapore", &["sgp"], Region::Asia),
    ("MY", "Malaysia", &["mys"], Region::Asia),
    ("TH", "Thailand", &["tha"], Region::Asia),
    ("VN", "Vietnam", &["vnm", "viet nam"], Region::Asia),
    ("ID", "Indonesia", &["idn"], Region::Asia),
    ("PH", "Philippines", &["phl"], Region::Asia),
    ("AU", "Australia", &["aus"], Region::Oceania),
    ("NZ", "New Zealand", &["nzl"], Region::Oceania),
];

/// (name, country code, aliases)
const CITIES: &[(&str, &str, &[&str])] = &[
    ("New York", "US", &["new york city", "nyc", "manhattan", "brooklyn"]),
    ("San Francisco", "US", &["sf", "san fran"]),
    ("Los Angeles", "US", &["la"]),
    ("Seattle", "US", &[]),
    ("Boston", "US", &[]),
    ("Chicago", "US", &[]),
    ("Austin", "US", &[]),
    ("Denver", "US", &[]),
    ("Atlanta", "US", &[]),
    ("Miami", "US", &[]),
    ("Washington", "US", &["washington dc", "washington d.c.", "dc"]),
    ("San Jose", "US", &[]),
    ("San Diego", "US", &[]),
    ("Palo Alto", "US", &[]),
    ("Mountain View", "US", &[]),
    ("Portland", "US", &[]),
    ("Dallas", "US", &[]),
    ("Houston", "US", &[]),
    ("Philadelphia", "US", &[]),
    ("Pittsburgh", "US", &[]),
    ("Minneapolis", "US", &[]),
    ("Detroit", "US", &[]),
    ("Toronto", "CA", &[]),
    ("Vancouver", "CA", &[]),
    ("Montreal", "CA", &["montréal"]),
    ("Ottawa", "CA", &[]),
    ("Calgary", "CA", &[]),
    ("Mexico City", "MX", &["ciudad de mexico", "cdmx"]),
    ("Guadalajara", "MX", &[]),
    ("Sao Paulo", "BR", &["são paulo"]),
    ("Rio de Janeiro", "BR", &[]),
    ("Buenos Aires", "AR", &[]),
    ("Santiago", "CL", &[]),
    ("Bogota", "CO", &["bogotá"]),
    ("Lima", "PE", &[]),
    ("London", "GB", &[]),
    ("Manchester", "GB", &[]),
    ("Edinburgh", "GB", &[]),
    ("Cambridge", "GB", &[]),
    ("Oxford", "GB", &[]),
    ("Bristol", "GB", &[]),
    ("Dublin", "IE", &[]),
    ("Berlin", "DE", &[]),
    ("Munich", "DE", &["münchen", "munchen"]),
    ("Hamburg", "DE", &[]),
    ("Frankfurt", "DE", &["frankfurt am main"]),
    ("Cologne", "DE", &["köln", "koln"]),
    ("Stuttgart", "DE", &[]),
    ("Dusseldorf", "DE", &["düsseldorf"]),
    ("Leipzig", "DE", &[]),
    ("Paris", "FR", &[]),
    ("Lyon", "FR", &[]),
    ("Marseille", "FR", &[]),
    ("Toulouse", "FR", &[]),
    ("Madrid", "ES", &[]),
    ("Barcelona", "ES", &[]),
    ("Valencia", "ES", &[]),
    ("Lisbon", "PT", &["lisboa"]),
    ("Porto", "PT", &[]),
    ("Rome", "IT", &["roma"]),
    ("Milan", "IT", &["milano"]),
    ("Turin", "IT", &["torino"]),
    ("Amsterdam", "NL", &[]),
    ("Rotterdam", "NL", &[]),
    ("Eindhoven", "NL", &[]),
    ("Brussels", "BE", &["bruxelles"]),
    ("Antwerp", "BE", &[]),
    ("Zurich", "CH", &["zürich"]),
    ("Geneva", "CH", &["genève", "geneve"]),
    ("Vienna", "AT", &["wien"]),
    ("Copenhagen", "DK", &["københavn"]),
    ("Stockholm", "SE", &[]),
    ("Gothenburg", "SE", &["göteborg"]),
    ("Oslo", "NO", &[]),
    ("Helsinki", "FI", &[]),
    ("Warsaw", "PL", &["warszawa"]),
    ("Krakow", "PL", &["kraków"]),
    ("Prague", "CZ", &["praha"]),
    ("Budapest", "HU", &[]),
    ("Bucharest", "RO", &["bucuresti"]),
    ("Athens", "GR", &[]),
    ("Kyiv", "UA", &["kiev"]),
    ("Tallinn", "EE", &[]),
    ("Istanbul", "TR", &[]),
    ("Ankara", "TR", &[]),
    ("Tel Aviv", "IL", &["tel aviv-yafo"]),
    ("Jerusalem", "IL", &[]),
    ("Dubai", "AE", &[]),
    ("Abu Dhabi", "AE", &[]),
    ("Riyadh", "SA", &[]),
    ("Doha", "QA", &[]),
    ("Cairo", "EG", &[]),
    ("Lagos", "NG", &[]),
    ("Nairobi", "KE", &[]),
    ("Cape Town", "ZA", &[]),
    ("Johannesburg", "ZA", &[]),
    ("Casablanca", "MA", &[]),
    ("Bangalore", "IN", &["bengaluru"]),
    ("Mumbai", "IN", &["bombay"]),
    ("New Delhi", "IN", &["delhi"]),
    ("Hyderabad", "IN", &[]),
    ("Chennai", "IN", &["madras"]),
    ("Pune", "IN", &[]),
    ("Kolkata", "IN", &["calcutta"]),
    ("Karachi", "PK", &[]),
    ("Lahore", "PK", &[]),
    ("Dhaka", "BD", &[]),
    ("Beijing", "CN", &["peking"]),
    ("Shanghai", "CN", &[]),
    ("Shenzhen", "CN", &[]),
    ("Hangzhou", "CN", &[]),
    ("Taipei", "TW", &[]),
    ("Tokyo", "JP", &[]),
    ("Osaka", "JP", &[]),
    ("Kyoto", "JP", &[]),
    ("Seoul", "KR", &[]),
    ("Busan", "KR", &[]),
    ("Kuala Lumpur", "MY", &[]),
    ("Bangkok", "TH", &[]),
    ("Ho Chi Minh City", "VN", &["saigon", "ho chi minh"]),
    ("Hanoi", "VN", &[]),
    ("Jakarta", "ID", &[]),
    ("Manila", "PH", &[]),
    ("Sydney", "AU", &[]),
    ("Melbourne", "AU", &[]),
    ("Brisbane", "AU", &[]),
    ("Perth", "AU", &[]),
    ("Auckland", "NZ", &[]),
    ("Wellington", "NZ", &[]),
];

/// (code, name)
const US_STATES: &[(&str, &str)] = &[
    ("al", "alabama"), ("ak", "alaska"), ("az", "arizona"), ("ar", "arkansas"),
    ("ca", "california"), ("co", "colorado"), ("ct", "connecticut"), ("de", "delaware"),
    ("fl", "florida"), ("ga", "georgia"), ("hi", "hawaii"), ("id", "idaho"),
    ("il", "illinois"), ("in", "indiana"), ("ia", "iowa"), ("ks", "kansas"),
    ("ky", "kentucky"), ("la", "louisiana"), ("me", "maine"), ("md", "maryland"),
    ("ma", "massachusetts"), ("mi", "michigan"), ("mn", "minnesota"), ("ms", "mississippi"),
    ("mo", "missouri"), ("mt", "montana"), ("ne", "nebraska"), ("nv", "nevada"),
    ("nh", "new hampshire"), ("nj", "new jersey"), ("nm", "new mexico"), ("ny", "new york state"),
    ("nc", "north carolina"), ("nd", "north dakota"), ("oh", "ohio"), ("ok", "oklahoma"),
    ("or", "oregon"), ("pa", "pennsylvania"), ("ri", "rhode island"), ("sc", "south carolina"),
    ("sd", "south dakota"), ("tn", "tennessee"), ("tx", "texas"), ("ut", "utah"),
    ("vt", "vermont"), ("va", "virginia"), ("wa", "washington state"), ("wv", "west virginia"),
    ("wi", "wisconsin"), ("wy", "wyoming"), ("dc", "district of columbia"),
];

/// Minimum length for a spelling to be searched for inside running text.
/// Shorter aliases (`la`, `sf`, `uk`) only resolve as a whole location part.
const MIN_SCAN_LEN: usize = 4;

/// Lowercases and strips everything except letters, spaces, `-` and `'`.
/// Dots vanish so `U.S.A.` and `usa` are the same key.
pub fn location_key(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '.')
        .map(|c| {
            if c.is_alphabetic() || c == '-' || c == '\'' {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Read-only lookup structure, built once and shared.
#[derive(Debug)]
pub struct Gazetteer {
    countries: Vec<Country>,
    cities: Vec<City>,
    country_index: HashMap<String, usize>,
    city_index: HashMap<String, usize>,
    us_states: HashMap<String, &'static str>,
}

impl Gazetteer {
    pub fn country(&self, code: &str) -> Option<&Country> {
        self.countries.iter().find(|c| c.code == code)
    }

    pub fn lookup_country(&self, key: &str) -> Option<&Country> {
        self.country_index.get(key).map(|&i| &self.countries[i])
    }

    pub fn lookup_city(&self, key: &str) -> Option<&City> {
        self.city_index.get(key).map(|&i| &self.cities[i])
    }

    pub fn is_us_state(&self, key: &str) -> bool {
        self.us_states.contains_key(key)
    }

    /// Spellings of cities long enough to be searched for in running text.
    pub fn scannable_cities(&self) -> impl Iterator<Item = (&str, &City)> {
        self.city_index
            .iter()
            .filter(|(key, _)| key.len() >= MIN_SCAN_LEN)
            .map(|(key, &i)| (key.as_str(), &self.cities[i]))
    }

    /// Spellings of countries long enough to be searched for in running text.
    pub fn scannable_countries(&self) -> impl Iterator<Item = (&str, &Country)> {
        self.country_index
            .iter()
            .filter(|(key, _)| key.len() >= MIN_SCAN_LEN)
            .map(|(key, &i)| (key.as_str(), &self.countries[i]))
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        let mut countries = Vec::with_capacity(COUNTRIES.len());
        let mut country_index = HashMap::new();
        for (i, &(code, name, aliases, region)) in COUNTRIES.iter().enumerate() {
            countries.push(Country { code, name, region });
            country_index.insert(location_key(code), i);
            country_index.insert(location_key(name), i);
            for alias in aliases.iter() {
                country_index.insert(location_key(alias), i);
            }
        }

        let mut cities = Vec::with_capacity(CITIES.len());
        let mut city_index = HashMap::new();
        for (i, &(name, country_code, aliases)) in CITIES.iter().enumerate() {
            cities.push(City { name, country_code });
            city_index.insert(location_key(name), i);
            for alias in aliases.iter() {
                city_index.insert(location_key(alias), i);
            }
        }

        let mut us_states = HashMap::new();
        for &(code, name) in US_STATES {
            us_states.insert(code.to_string(), "US");
            us_states.insert(name.to_string(), "US");
        }

        Self {
            countries,
            cities,
            country_index,
            city_index,
            us_states,
        }
    }
}
