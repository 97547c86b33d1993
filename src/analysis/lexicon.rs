//! Word lists backing the offline classifiers.

/// (word, valence) pairs; valence in [-3, 3]
pub const VALENCE: &[(&str, f64)] = &[
    ("amazing", 3.0),
    ("awesome", 3.0),
    ("best", 2.5),
    ("beautiful", 2.5),
    ("brilliant", 3.0),
    ("cool", 1.5),
    ("enjoy", 2.0),
    ("enjoyed", 2.0),
    ("excellent", 3.0),
    ("fantastic", 3.0),
    ("fun", 2.0),
    ("glad", 2.0),
    ("good", 1.5),
    ("great", 2.5),
    ("happy", 2.5),
    ("helpful", 2.0),
    ("interesting", 1.5),
    ("like", 1.0),
    ("liked", 1.0),
    ("love", 3.0),
    ("loved", 3.0),
    ("nice", 1.5),
    ("perfect", 3.0),
    ("recommend", 1.5),
    ("superb", 3.0),
    ("thank", 1.5),
    ("thanks", 1.5),
    ("useful", 1.5),
    ("wonderful", 3.0),
    ("wow", 2.0),
    ("annoying", -2.0),
    ("awful", -3.0),
    ("bad", -2.0),
    ("boring", -2.0),
    ("clickbait", -2.5),
    ("confusing", -1.5),
    ("disappointed", -2.5),
    ("disappointing", -2.5),
    ("dislike", -2.0),
    ("fake", -2.0),
    ("hate", -3.0),
    ("horrible", -3.0),
    ("misleading", -2.0),
    ("poor", -2.0),
    ("sad", -1.5),
    ("scam", -3.0),
    ("stupid", -2.5),
    ("terrible", -3.0),
    ("trash", -3.0),
    ("useless", -2.5),
    ("waste", -2.5),
    ("worse", -2.5),
    ("worst", -3.0),
    ("wrong", -1.5),
];

pub const NEGATIONS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "isn't", "wasn't", "aren't", "can't",
    "won't", "nothing", "hardly",
    // Contractions after comment cleaning drops the apostrophe
    "dont", "doesnt", "didnt", "isnt", "wasnt", "arent", "cant", "wont", "shouldnt", "wouldnt",
    "couldnt", "aint",
];

/// (word, multiplier) applied to the next sentiment word
pub const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.5),
    ("really", 1.4),
    ("so", 1.3),
    ("extremely", 1.8),
    ("super", 1.5),
    ("absolutely", 1.6),
    ("totally", 1.4),
    ("slightly", 0.6),
    ("somewhat", 0.7),
];

pub const JOY: &[&str] = &[
    "happy", "joy", "glad", "love", "wonderful", "great", "amazing", "fun", "laugh", "smile",
    "excited", "delighted", "celebrate", "awesome", "enjoy", "beautiful", "fantastic", "yay",
];

pub const ANGER: &[&str] = &[
    "angry", "anger", "furious", "hate", "rage", "annoyed", "mad", "outrage", "damn", "stupid",
    "idiot", "irritated", "hostile", "fight", "attack",
];

pub const SADNESS: &[&str] = &[
    "sad", "cry", "crying", "tears", "miss", "lonely", "depressed", "grief", "sorrow", "unhappy",
    "heartbroken", "loss", "lost", "died", "death", "sorry", "hurt",
];

pub const FEAR: &[&str] = &[
    "afraid", "fear", "scared", "terrified", "panic", "anxious", "worry", "worried", "danger",
    "dangerous", "threat", "nervous", "horror", "risk", "frightening",
];

pub const SURPRISE: &[&str] = &[
    "surprise", "surprised", "wow", "unexpected", "shocked", "shocking", "suddenly", "amazed",
    "unbelievable", "whoa", "incredible", "astonishing",
];

pub const DISGUST: &[&str] = &[
    "disgusting", "gross", "nasty", "yuck", "awful", "revolting", "sick", "vile", "filthy",
    "rotten", "repulsive",
];

/// Common English function words excluded from keyword candidates
pub const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "don't", "down", "during", "each",
    "even", "few", "for", "from", "further", "get", "go", "going", "gonna", "got", "had", "has",
    "have", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "i",
    "i'm", "if", "in", "into", "is", "it", "it's", "its", "itself", "just", "know", "let", "like",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "okay", "on",
    "once", "one", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own",
    "really", "right", "said", "same", "say", "see", "she", "should", "so", "some", "such",
    "than", "that", "that's", "the", "their", "theirs", "them", "themselves", "then", "there",
    "these", "they", "thing", "things", "think", "this", "those", "through", "to", "too",
    "under", "until", "up", "us", "very", "want", "was", "we", "well", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would", "yeah", "you",
    "you're", "your", "yours", "yourself", "yourselves",
];
