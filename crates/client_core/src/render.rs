use shared::domain::{LayoutVariant, Story};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSide {
    Left,
    Right,
}

/// One visual block of the story view, in the order received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryBlock<'a> {
    pub index: usize,
    pub paragraph: &'a str,
    pub image_url: Option<&'a str>,
    pub image_side: ImageSide,
}

pub fn image_side(index: usize, layout: LayoutVariant) -> ImageSide {
    match layout {
        LayoutVariant::Stacked => ImageSide::Left,
        LayoutVariant::SideBySide if index % 2 == 0 => ImageSide::Left,
        LayoutVariant::SideBySide => ImageSide::Right,
    }
}

pub fn render_blocks(story: &Story, layout: LayoutVariant) -> Vec<StoryBlock<'_>> {
    story
        .parts
        .iter()
        .enumerate()
        .map(|(index, part)| StoryBlock {
            index,
            paragraph: part.paragraph.as_str(),
            image_url: part.image_url(),
            image_side: image_side(index, layout),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use shared::domain::StoryPart;

    use super::*;

    fn story() -> Story {
        Story::new(vec![
            StoryPart::new("first", Some("http://host/images/1.png".to_string())),
            StoryPart::new("second", Some("None".to_string())),
            StoryPart::text("third"),
        ])
    }

    #[test]
    fn renders_one_block_per_part_in_order() {
        let story = story();
        let blocks = render_blocks(&story, LayoutVariant::Stacked);

        let paragraphs: Vec<_> = blocks.iter().map(|block| block.paragraph).collect();
        assert_eq!(paragraphs, vec!["first", "second", "third"]);
        assert_eq!(blocks[0].image_url, Some("http://host/images/1.png"));
        assert_eq!(blocks[1].image_url, None);
        assert_eq!(blocks[2].image_url, None);
        assert!(blocks.iter().all(|block| block.image_side == ImageSide::Left));
    }

    #[test]
    fn side_by_side_alternates_from_the_left() {
        let story = story();
        let sides: Vec<_> = render_blocks(&story, LayoutVariant::SideBySide)
            .into_iter()
            .map(|block| block.image_side)
            .collect();
        assert_eq!(sides, vec![ImageSide::Left, ImageSide::Right, ImageSide::Left]);
    }
}
