use ahash::AHashMap;

/// Index of the padding token. Sequences shorter than the requested
/// length are filled with this index, and decoding skips it.
pub const PAD_INDEX: u32 = 0;

/// Index words not present in the table map to.
pub const UNK_INDEX: u32 = 1;

const PAD_TOKEN: &str = "<pad>";
const UNK_TOKEN: &str = "<unk>";

/// Bidirectional word <-> index mapping built from a corpus.
#[derive(Debug)]
pub struct Vocab {
    word_to_index: AHashMap<String, u32>,
    index_to_word: Vec<String>,
}

impl Vocab {
    pub fn new() -> Self {
        let mut vocab = Self {
            word_to_index: AHashMap::new(),
            index_to_word: Vec::new(),
        };
        vocab.add_word(PAD_TOKEN);
        vocab.add_word(UNK_TOKEN);
        vocab
    }

    /// Registers every token of the sentence.
    pub fn add_sentence(&mut self, sentence: &str) {
        for token in tokenize(sentence) {
            self.add_word(&token);
        }
    }

    /// Registers a single word, returning its index. Already-known words
    /// keep their existing index.
    pub fn add_word(&mut self, word: &str) -> u32 {
        if let Some(&index) = self.word_to_index.get(word) {
            return index;
        }
        let index = self.index_to_word.len() as u32;
        self.word_to_index.insert(word.to_string(), index);
        self.index_to_word.push(word.to_string());
        index
    }

    pub fn index_of(&self, word: &str) -> u32 {
        self.word_to_index.get(word).copied().unwrap_or(UNK_INDEX)
    }

    pub fn word_at(&self, index: u32) -> Option<&str> {
        self.index_to_word.get(index as usize).map(String::as_str)
    }

    pub fn n_words(&self) -> usize {
        self.index_to_word.len()
    }

    /// Encodes a sentence into exactly `max_len` indices, truncating long
    /// sentences and padding short ones with `PAD_INDEX`.
    pub fn encode(&self, sentence: &str, max_len: usize) -> Vec<u32> {
        let mut indices: Vec<u32> = tokenize(sentence)
            .map(|token| self.index_of(&token))
            .take(max_len)
            .collect();
        indices.resize(max_len, PAD_INDEX);
        indices
    }

    /// Reconstructs a readable sentence from an index sequence, skipping
    /// padding. Out-of-table indices render as the unknown token.
    pub fn decode(&self, indices: &[u32]) -> String {
        let words: Vec<&str> = indices
            .iter()
            .filter(|&&index| index != PAD_INDEX)
            .map(|&index| self.word_at(index).unwrap_or(UNK_TOKEN))
            .collect();
        words.join(" ")
    }
}

impl Default for Vocab {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercased whitespace tokenization.
pub fn tokenize(sentence: &str) -> impl Iterator<Item = String> + '_ {
    sentence.split_whitespace().map(str::to_lowercase)
}
