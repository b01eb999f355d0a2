use super::{
    error::ContentError,
    ordering::{Ordered, move_item, sort_by_order},
};

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Paragraph { content: String },
    Image { url: String },
}

/// Type-specific part of a chapter, tagged by `chapterType`.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "chapterType", rename_all = "lowercase")]
pub enum ChapterContent {
    #[serde(rename_all = "camelCase")]
    Audio { chapter_url: String },
    #[serde(rename_all = "camelCase")]
    Text {
        #[serde(default)]
        content_blocks: Vec<ContentBlock>,
        #[serde(default)]
        text_content: String,
    },
    #[serde(rename_all = "camelCase")]
    Series {
        series_id: String,
        #[serde(default)]
        episode_count: i32,
    },
}

impl ChapterContent {
    /// Text body whose plain `textContent` is the paragraphs joined by newlines.
    pub fn text(content_blocks: Vec<ContentBlock>) -> Self {
        let text_content = content_blocks
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Paragraph { content } => Some(content.as_str()),
                ContentBlock::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        ChapterContent::Text {
            content_blocks,
            text_content,
        }
    }

    pub fn is_audio(&self) -> bool {
        matches!(self, ChapterContent::Audio { .. })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub chapter_id: i64,
    pub chapter_name: String,
    pub order: i32,
    pub is_free: bool,
    pub is_locked: bool,
    #[serde(default)]
    pub is_downloadable: bool,
    #[serde(flatten)]
    pub content: ChapterContent,
}

impl Ordered for Chapter {
    fn order(&self) -> i32 {
        self.order
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }
}

fn position_of(chapters: &[Chapter], chapter_id: i64) -> Result<usize, ContentError> {
    chapters
        .iter()
        .position(|c| c.chapter_id == chapter_id)
        .ok_or(ContentError::ChapterNotFound(chapter_id))
}

/// Renumbers `order` to 0..N-1 and frees the first chapter. Lock flags of the
/// other chapters are left as they are.
fn renumber_access(chapters: &mut [Chapter]) {
    for (position, chapter) in chapters.iter_mut().enumerate() {
        chapter.order = position as i32;
        chapter.is_free = position == 0;
        if position == 0 {
            chapter.is_locked = false;
        }
    }
}

/// Derives `order`, `isFree` and `isLocked` purely from position.
fn rederive_access(chapters: &mut [Chapter]) {
    for (position, chapter) in chapters.iter_mut().enumerate() {
        chapter.order = position as i32;
        chapter.is_free = position == 0;
        chapter.is_locked = position != 0;
    }
}

pub fn next_chapter_id(chapters: &[Chapter]) -> i64 {
    chapters
        .iter()
        .map(|c| c.chapter_id)
        .max()
        .map_or(0, |max| max + 1)
}

/// Appends a chapter at the end of the list.
pub fn add_chapter(
    chapters: &mut Vec<Chapter>,
    chapter_name: String,
    content: ChapterContent,
) -> Chapter {
    sort_by_order(chapters);

    let chapter = Chapter {
        chapter_id: next_chapter_id(chapters),
        chapter_name,
        order: chapters.len() as i32,
        is_free: false,
        is_locked: true,
        is_downloadable: content.is_audio(),
        content,
    };
    chapters.push(chapter);
    renumber_access(chapters);

    chapters[chapters.len() - 1].clone()
}

/// Replaces name and body; id, position and access flags stay.
pub fn update_chapter(
    chapters: &mut [Chapter],
    chapter_id: i64,
    chapter_name: String,
    content: ChapterContent,
) -> Result<Chapter, ContentError> {
    let position = position_of(chapters, chapter_id)?;

    let chapter = &mut chapters[position];
    chapter.chapter_name = chapter_name;
    chapter.is_downloadable = content.is_audio();
    chapter.content = content;

    Ok(chapter.clone())
}

pub fn remove_chapter(chapters: &mut Vec<Chapter>, chapter_id: i64) -> Result<Chapter, ContentError> {
    sort_by_order(chapters);
    let position = position_of(chapters, chapter_id)?;

    let removed = chapters.remove(position);
    renumber_access(chapters);

    Ok(removed)
}

/// Drag-and-drop move from index `from` to index `to` of the ordered list.
pub fn move_chapter(chapters: &mut Vec<Chapter>, from: usize, to: usize) -> Result<(), ContentError> {
    sort_by_order(chapters);
    move_item(chapters, from, to)?;
    rederive_access(chapters);

    Ok(())
}

pub fn toggle_chapter_lock(chapters: &mut [Chapter], chapter_id: i64) -> Result<Chapter, ContentError> {
    let position = position_of(chapters, chapter_id)?;

    let chapter = &mut chapters[position];
    chapter.is_locked = !chapter.is_locked;

    Ok(chapter.clone())
}
