use crate::corpus::Corpus;

pub const GENESIS_1_1: &str = "In the beginning God created the heaven and the earth.";

pub fn sample_corpus() -> Corpus {
    let mut corpus = Corpus::new();
    corpus.insert("Genesis", 1, 1, GENESIS_1_1);
    corpus.insert(
        "Genesis",
        1,
        2,
        "And the earth was without form, and void; and darkness was upon the face of the deep.",
    );
    corpus.insert(
        "Genesis",
        1,
        3,
        "And God said, Let there be light: and there was light.",
    );
    corpus.insert(
        "Genesis",
        2,
        7,
        "And the LORD God formed man of the dust of the ground.",
    );
    corpus.insert(
        "John",
        3,
        16,
        "For God so loved the world, that he gave his only begotten Son, that whosoever believeth in him should not perish, but have everlasting life.",
    );
    corpus
}

/// Books whose names collide under prefix matching.
pub fn numbered_books_corpus() -> Corpus {
    let mut corpus = Corpus::new();
    corpus.insert("1 Samuel", 3, 10, "Speak; for thy servant heareth.");
    corpus.insert("2 Samuel", 7, 22, "Wherefore thou art great, O LORD God.");
    corpus.insert("John", 1, 1, "In the beginning was the Word.");
    corpus.insert("1 John", 4, 8, "He that loveth not knoweth not God; for God is love.");
    corpus.insert("2 John", 1, 6, "And this is love, that we walk after his commandments.");
    corpus.insert("3 John", 1, 4, "I have no greater joy than to hear that my children walk in truth.");
    corpus.insert("Jude", 1, 25, "To the only wise God our Saviour, be glory and majesty.");
    corpus.insert("Judges", 21, 25, "In those days there was no king in Israel.");
    corpus
}
