//! Built-in content shown when the API is unreachable or returns too little.

use crate::domain::{Card, Slide};

pub const FALLBACK_TIME: &str = "1 giờ trước";

/// Id used by fallback main cards. It matches no real article.
pub const FALLBACK_MAIN_ID: &str = "0";

type CardSeed = (&'static str, &'static str, &'static str);

/// Static content for one home section.
#[derive(Debug, Clone, Copy)]
pub struct SectionFallback {
    pub label: &'static str,
    pub main_image: &'static str,
    pub main_title: &'static str,
    cards: &'static [CardSeed],
}

impl SectionFallback {
    pub fn main_card(&self) -> Card {
        Card {
            id: FALLBACK_MAIN_ID.to_string(),
            image: self.main_image.to_string(),
            title: self.main_title.to_string(),
            tag: self.label.to_string(),
            time: FALLBACK_TIME.to_string(),
        }
    }

    pub fn cards(&self) -> Vec<Card> {
        self.cards
            .iter()
            .map(|seed| card(seed, self.label))
            .collect()
    }
}

fn card(&(id, image, title): &CardSeed, tag: &str) -> Card {
    Card {
        id: id.to_string(),
        image: image.to_string(),
        title: title.to_string(),
        tag: tag.to_string(),
        time: FALLBACK_TIME.to_string(),
    }
}

const EXPLORE_CARDS: [CardSeed; 4] = [
    ("1", "/assets/images/coin.png", "Meme coin chiếm 41% thị phần thị trường AI crypto, nhưng DeFAI đang phát triển"),
    ("2", "/assets/images/disk.png", "Một số xu hướng AI crypto nổi bật trong tháng 6/2025 bạn nên biết"),
    ("3", "/assets/images/ssd.png", "DeFAI tăng trưởng mạnh mẽ nhờ sự góp mặt của meme coin AI"),
    ("4", "/assets/images/marksafe.png", "Thị trường AI blockchain đang thay đổi, đâu là cơ hội?"),
];

const AI_CARDS: [CardSeed; 4] = [
    ("5", "/assets/images/phone2.png", "Gemini và Grok đang cạnh tranh vị trí dẫn đầu AI"),
    ("6", "/assets/images/airpod.png", "Meme coin AI chiếm đỉnh thị trong xu hướng crypto 2025"),
    ("7", "/assets/images/phone3.png", "Thị trường AI blockchain: Đâu là \"chatGPT\" tiếp theo?"),
    ("8", "/assets/images/ring.png", "AI crypto vành đai mới của blockchain trong tương lai"),
];

const MOBILE_CARDS: [CardSeed; 4] = [
    ("9", "/assets/images/smartwacth.png", "Nhiều coin mới nổi bật trong mảng Mobile AI"),
    ("10", "/assets/images/cpu.png", "Xu hướng thiết bị AI di động thay đổi trải nghiệm người dùng"),
    ("11", "/assets/images/tablet.png", "Meme AI Mobile dẫn đầu tăng trưởng"),
    ("12", "/assets/images/phone5.png", "Top thiết bị AI Mobile được ưa chuộng 2025"),
];

const GAME_CARDS: [CardSeed; 4] = [
    ("13", "/assets/images/game1.png", "Web3 game AI tích hợp dẫn đầu xu hướng"),
    ("14", "/assets/images/game2.png", "Starfield AI Mode nhận phản hồi tích cực"),
    ("15", "/assets/images/game3.png", "Tương lai game AI: Metaverse hay thực tế?"),
    ("16", "/assets/images/game4.png", "AI game giải trí hay công cụ giáo dục?"),
];

pub const SECTION_FALLBACKS: [SectionFallback; 4] = [
    SectionFallback {
        label: "Khám phá",
        main_image: "/assets/images/controller.png",
        main_title: "Doodles (DOOD) là gì? Dự án NFT gọi vốn $54 triệu Đô với các ông lớn Web2 có gì đặc biệt?",
        cards: &EXPLORE_CARDS,
    },
    SectionFallback {
        label: "A.I",
        main_image: "/assets/images/grok.png",
        main_title: "AI crypto và những tiềm năng thay đổi blockchain trong tương lai",
        cards: &AI_CARDS,
    },
    SectionFallback {
        label: "Mobile",
        main_image: "/assets/images/phone4.png",
        main_title: "Meme coin chiếm 41% thị phần thị trường AI crypto, nhưng DeFAI đang phát triển",
        cards: &MOBILE_CARDS,
    },
    SectionFallback {
        label: "Game",
        main_image: "/assets/images/starfield.png",
        main_title: "Web3 Game và làn sóng AI tích hợp, bùng nổ hay thoái trào?",
        cards: &GAME_CARDS,
    },
];

/// Fallback content for a section label, matched case-insensitively.
/// Unknown labels get the first section's content.
pub fn section_fallback(label: &str) -> SectionFallback {
    SECTION_FALLBACKS
        .iter()
        .find(|f| f.label.eq_ignore_ascii_case(label))
        .copied()
        .unwrap_or(SECTION_FALLBACKS[0])
}

const RELATED_TITLES: [&str; 4] = [
    "Meme coin chiếm 41% thị phần thị trường AI crypto, nhưng DeFAI đang phát triển",
    "Gemini và Grok đang cạnh tranh vị trí dẫn đầu AI",
    "Thị trường AI blockchain: Đâu là \"chatGPT\" tiếp theo?",
    "AI crypto vành đai mới của blockchain trong tương lai",
];

/// The eight "Cùng chủ đề" cards used when no related article is found.
pub fn related_cards() -> Vec<Card> {
    (0..8)
        .map(|i| {
            let image = if i < 4 {
                format!("/assets/images/card{}.png", i + 1)
            } else {
                "/assets/images/coin.png".to_string()
            };
            Card {
                id: (21 + i).to_string(),
                image,
                title: RELATED_TITLES[i % RELATED_TITLES.len()].to_string(),
                tag: "A.I".to_string(),
                time: FALLBACK_TIME.to_string(),
            }
        })
        .collect()
}

const SLIDES: [(&str, &str, &str, &str); 6] = [
    (
        "/assets/images/slider1.png",
        "Meme coin chiếm 41% thị phần thị trường AI crypto",
        "Khám phá",
        "DeFAI đang phát triển mạnh mẽ với sự tham gia của các dự án AI hàng đầu",
    ),
    (
        "/assets/images/slider2.png",
        "Web3 Game và làn sóng AI tích hợp bùng nổ",
        "Game",
        "Công nghệ AI đang thay đổi cách chúng ta tương tác với game",
    ),
    (
        "/assets/images/slider3.png",
        "Xu hướng thiết bị AI di động 2025",
        "Mobile",
        "Thiết bị AI di động đang thay đổi trải nghiệm người dùng",
    ),
    (
        "/assets/images/slider4.png",
        "Gemini và Grok cạnh tranh vị trí dẫn đầu AI",
        "A.I",
        "Cuộc đua AI giữa các ông lớn công nghệ ngày càng gay gắt",
    ),
    (
        "/assets/images/cpu.png",
        "Blockchain và AI: Tương lai của công nghệ",
        "Blockchain",
        "Sự kết hợp giữa blockchain và AI mở ra nhiều cơ hội mới",
    ),
    (
        "/assets/images/ssd.png",
        "NFT và metaverse phát triển mạnh",
        "NFT",
        "Thị trường NFT và metaverse đang tạo ra làn sóng mới",
    ),
];

pub const STATIC_SLIDE_COUNT: usize = SLIDES.len();

/// Static slide `index`, wrapping around.
pub fn static_slide(index: usize) -> Slide {
    let i = index % SLIDES.len();
    let (image, title, tag, description) = SLIDES[i];
    Slide {
        id: (i + 1).to_string(),
        image: image.to_string(),
        title: title.to_string(),
        tag: tag.to_string(),
        description: description.to_string(),
    }
}
