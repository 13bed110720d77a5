/// The 66 books in canonical order; book number N is `CANONICAL_BOOKS[N - 1]`.
pub const CANONICAL_BOOKS: [&str; 66] = [
    "Genesis", "Exodus", "Leviticus", "Numbers", "Deuteronomy",
    "Joshua", "Judges", "Ruth", "1 Samuel", "2 Samuel", "1 Kings", "2 Kings",
    "1 Chronicles", "2 Chronicles", "Ezra", "Nehemiah", "Esther", "Job",
    "Psalms", "Proverbs", "Ecclesiastes", "Song of Solomon",
    "Isaiah", "Jeremiah", "Lamentations", "Ezekiel", "Daniel", "Hosea", "Joel",
    "Amos", "Obadiah", "Jonah", "Micah", "Nahum", "Habakkuk", "Zephaniah",
    "Haggai", "Zechariah", "Malachi",
    "Matthew", "Mark", "Luke", "John", "Acts", "Romans", "1 Corinthians",
    "2 Corinthians", "Galatians", "Ephesians", "Philippians", "Colossians",
    "1 Thessalonians", "2 Thessalonians", "1 Timothy", "2 Timothy", "Titus",
    "Philemon", "Hebrews", "James", "1 Peter", "2 Peter", "1 John", "2 John",
    "3 John", "Jude", "Revelation",
];

/// Heading spellings seen in plain-text editions that differ from the
/// canonical name.
const HEADING_ALIASES: [(&str, &str); 3] = [
    ("Psalm", "Psalms"),
    ("Song of Songs", "Song of Solomon"),
    ("Revelation of John", "Revelation"),
];

/// 1-based book number, as used by row-oriented datasets.
pub fn book_by_number(number: u64) -> Option<&'static str> {
    let idx = usize::try_from(number).ok()?.checked_sub(1)?;
    CANONICAL_BOOKS.get(idx).copied()
}

/// Recognizes a book heading line ("Genesis", "1 Samuel", "Psalm 1") and
/// returns its canonical name.
///
/// A heading may be followed by a chapter number; anything else after the
/// name means the line is not a heading.
pub fn heading_book(line: &str) -> Option<&'static str> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidates = CANONICAL_BOOKS
        .iter()
        .map(|book| (*book, *book))
        .chain(HEADING_ALIASES.iter().copied());

    // Longest name first so "Song of Songs" is not cut short by a shorter match.
    let mut best: Option<(&str, &'static str)> = None;
    for (spelling, canonical) in candidates {
        if !trimmed.starts_with(spelling) {
            continue;
        }
        let rest = &trimmed[spelling.len()..];
        let is_heading = rest.is_empty()
            || (rest.starts_with(char::is_whitespace)
                && rest.trim().chars().all(|c| c.is_ascii_digit()));
        if is_heading && best.map_or(true, |(b, _)| spelling.len() > b.len()) {
            best = Some((spelling, canonical));
        }
    }

    best.map(|(_, canonical)| canonical)
}

/// Chapter number carried on a heading line ("Psalm 23" -> 23).
pub fn heading_chapter(line: &str) -> Option<u32> {
    let (name, tail) = line.trim().rsplit_once(char::is_whitespace)?;
    heading_book(name)?;
    tail.parse::<u32>().ok()
}
