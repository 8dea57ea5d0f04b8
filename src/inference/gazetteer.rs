//! Word lists used by the rule-based entity recognizer.
//!
//! Entries are lowercase.

/// Countries, regions and major cities, in English, French and German.
pub const PLACES: &[&str] = &[
    // countries (en)
    "afghanistan", "albania", "algeria", "andorra", "angola", "argentina", "armenia",
    "australia", "austria", "azerbaijan", "bahrain", "bangladesh", "belarus", "belgium",
    "benin", "bolivia", "bosnia", "botswana", "brazil", "bulgaria", "burkina faso",
    "burundi", "cambodia", "cameroon", "canada", "chad", "chile", "china", "colombia",
    "congo", "costa rica", "croatia", "cuba", "cyprus", "czechia", "czech republic",
    "denmark", "ecuador", "egypt", "england", "estonia", "ethiopia", "finland", "france",
    "gabon", "georgia", "germany", "ghana", "greece", "guatemala", "guinea", "haiti",
    "honduras", "hungary", "iceland", "india", "indonesia", "iran", "iraq", "ireland",
    "israel", "italy", "jamaica", "japan", "jordan", "kazakhstan", "kenya", "kosovo",
    "kuwait", "laos", "latvia", "lebanon", "liberia", "libya", "liechtenstein",
    "lithuania", "luxembourg", "madagascar", "malaysia", "mali", "malta", "mauritania",
    "mexico", "moldova", "monaco", "mongolia", "montenegro", "morocco", "mozambique",
    "myanmar", "namibia", "nepal", "netherlands", "new zealand", "nicaragua", "niger",
    "nigeria", "north korea", "norway", "oman", "pakistan", "palestine", "panama",
    "paraguay", "peru", "philippines", "poland", "portugal", "qatar", "romania", "russia",
    "rwanda", "saudi arabia", "scotland", "senegal", "serbia", "singapore", "slovakia",
    "slovenia", "somalia", "south africa", "south korea", "spain", "sri lanka", "sudan",
    "sweden", "switzerland", "syria", "taiwan", "tanzania", "thailand", "togo", "tunisia",
    "turkey", "uganda", "ukraine", "united kingdom", "united states",
    "united states of america", "uruguay", "uzbekistan", "venezuela", "vietnam", "wales",
    "yemen", "zambia", "zimbabwe", "uk", "us", "usa", "u.s", "u.k", "europe", "africa",
    "asia", "america", "north america", "south america", "antarctica", "oceania",
    // countries (fr)
    "allemagne", "algérie", "angleterre", "arabie saoudite", "argentine", "autriche",
    "belgique", "brésil", "bulgarie", "cameroun", "chine", "chypre", "colombie",
    "corée du sud", "corée du nord", "croatie", "danemark", "égypte", "espagne",
    "estonie", "états-unis", "éthiopie", "finlande", "grèce", "hongrie", "inde",
    "indonésie", "irak", "irlande", "islande", "italie", "japon", "jordanie", "liban",
    "lituanie", "maroc", "mexique", "norvège", "nouvelle-zélande", "pays-bas", "pérou",
    "pologne", "roumanie", "royaume-uni", "russie", "sénégal", "slovaquie", "slovénie",
    "suède", "suisse", "syrie", "tchéquie", "tunisie", "turquie", "ukraine", "afrique",
    "amérique", "asie",
    // countries (de)
    "ägypten", "belgien", "brasilien", "bulgarien", "dänemark", "deutschland",
    "england", "finnland", "frankreich", "griechenland", "indien", "irland", "island",
    "italien", "japan", "kanada", "kroatien", "lettland", "litauen", "luxemburg",
    "marokko", "mexiko", "niederlande", "norwegen", "österreich", "polen", "portugal",
    "rumänien", "russland", "schweden", "schweiz", "serbien", "slowakei", "slowenien",
    "spanien", "südafrika", "tschechien", "türkei", "ungarn", "vereinigte staaten",
    "vereinigtes königreich", "europa", "afrika", "asien", "amerika",
    // regions and cities
    "alsace", "amsterdam", "athens", "athènes", "bavaria", "bayern", "beijing", "berlin",
    "bern", "berne", "bordeaux", "boston", "brussels", "bruxelles", "brüssel",
    "budapest", "buenos aires", "california", "cairo", "chicago", "cologne", "köln",
    "copenhagen", "delhi", "dublin", "frankfurt", "geneva", "genève", "genf", "hamburg",
    "helsinki", "hong kong", "istanbul", "jerusalem", "kyiv", "kiev", "lille", "lisbon",
    "lisbonne", "london", "londres", "los angeles", "lyon", "madrid", "marseille",
    "milan", "montreal", "montréal", "moscow", "moscou", "moskau", "mumbai", "munich",
    "münchen", "nantes", "new york", "nice", "oslo", "paris", "prague", "prag",
    "quebec", "québec", "rome", "rom", "san francisco", "seoul", "shanghai", "stockholm",
    "strasbourg", "straßburg", "stuttgart", "sydney", "texas", "tokyo", "toronto",
    "toulouse", "vienna", "vienne", "wien", "warsaw", "varsovie", "warschau",
    "washington", "zurich", "zürich",
];

/// Trailing words marking an organization name.
pub const ORGANIZATION_WORDS: &[&str] = &[
    "ag", "association", "bank", "bund", "club", "co", "college", "commission",
    "committee", "company", "corp", "corporation", "council", "foundation", "fc",
    "gmbh", "group", "inc", "institute", "institut", "ltd", "ministry", "ministère",
    "ministerium", "nations", "organization", "organisation", "parliament", "parlement",
    "party", "parti", "partei", "plc", "sa", "sarl", "school", "société", "times",
    "union", "university", "université", "universität", "verein",
];

/// Leading words marking an organization name.
pub const ORGANIZATION_HEADS: &[&str] = &[
    "bank", "banque", "university", "université", "universität", "ministry",
    "ministère", "institute", "institut", "parti", "conseil", "european", "union",
];

/// Titles preceding a person name. They are not part of the entity.
pub const TITLES: &[&str] = &[
    "mr", "mrs", "ms", "miss", "dr", "prof", "professor", "sir", "lady", "lord", "president",
    "senator", "minister", "king", "queen", "pope", "saint", "st", "general", "m", "mme",
    "mlle", "monsieur", "madame", "mademoiselle", "président", "présidente", "ministre",
    "herr", "frau", "präsident", "präsidentin", "kanzler", "kanzlerin",
];

/// Common given names.
pub const GIVEN_NAMES: &[&str] = &[
    "adam", "alain", "albert", "alexander", "alexandre", "alice", "andrew", "angela",
    "anna", "anne", "antoine", "barack", "bernard", "bill", "boris", "catherine",
    "charles", "charlotte", "christian", "christine", "claire", "daniel", "david",
    "donald", "elizabeth", "emily", "emma", "emmanuel", "eric", "françois", "frank",
    "franz", "george", "georg", "hans", "helmut", "henri", "henry", "isabelle", "jack",
    "jacques", "james", "jane", "jean", "jennifer", "joe", "johann", "johannes", "john",
    "joseph", "julia", "julie", "jürgen", "karl", "klaus", "laura", "laurent", "linda",
    "louis", "lucas", "marc", "marie", "mark", "martin", "mary", "michael", "michel",
    "monika", "nicolas", "olaf", "olivier", "paul", "peter", "philippe", "pierre",
    "richard", "robert", "sarah", "sophie", "stefan", "stephan", "susan", "thomas",
    "ursula", "vladimir", "werner", "william", "wolfgang",
];

/// Capitalized function words that never start an entity.
pub const STOPWORDS: &[&str] = &[
    // en
    "a", "after", "an", "and", "as", "at", "before", "but", "by", "during", "for", "from",
    "he", "her", "here", "his", "how", "i", "if", "in", "it", "its", "my", "on", "or", "our",
    "she", "so", "that", "the", "their", "there", "these", "they", "this", "those", "to",
    "today", "we", "what", "when", "where", "while", "who", "why", "with", "yesterday",
    "you",
    // fr
    "au", "aux", "ce", "cette", "dans", "de", "des", "du", "elle", "elles", "en", "et",
    "hier", "il", "ils", "je", "la", "le", "les", "mais", "nous", "pour", "sur", "un",
    "une", "vous",
    // de
    "aber", "am", "auf", "das", "dem", "der", "die", "ein", "eine", "er", "es", "gestern",
    "heute", "ich", "im", "mit", "sie", "und", "wir",
];

/// Lowercase words allowed inside a multi-word name.
pub const CONNECTORS: &[&str] = &[
    "da", "de", "del", "der", "des", "di", "du", "la", "of", "van", "von", "zu",
];
