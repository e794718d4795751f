use url::Url;

use crate::model::{ArticleGuid, GameDescriptor, GameId};

/// Query-string parameters identifying the active unit, for deep-linking.
///
/// The engine only builds the parameters; replacing the browser history
/// entry is the controller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeepLink {
    game_id: GameId,
    article_guid: Option<ArticleGuid>,
}

impl DeepLink {
    #[must_use]
    pub fn for_descriptor(descriptor: &GameDescriptor) -> Self {
        Self {
            game_id: descriptor.id(),
            article_guid: descriptor.article_guid(),
        }
    }

    #[must_use]
    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    #[must_use]
    pub fn article_guid(&self) -> Option<ArticleGuid> {
        self.article_guid
    }

    /// Rewrite `game_id` / `article_guid` on the URL in place, preserving
    /// every other query parameter.
    pub fn apply(&self, url: &mut Url) {
        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "game_id" && key != "article_guid")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair("game_id", &self.game_id.to_string());
        if let Some(guid) = self.article_guid {
            pairs.append_pair("article_guid", &guid.to_string());
        }
    }
}
