use crate::domain::model::{
    GithubStats, PartialGithubStats, PartialProfile, PartialSocials, Profile, Socials,
};

/// Applies `overlay` on top of `base`.
///
/// Scalars and lists are replaced only by present, non-empty values;
/// `socials` and `githubStats` merge key by key. `email` is never touched.
pub fn merge(base: Profile, overlay: &PartialProfile) -> Profile {
    let mut merged = base;

    replace_if_present(&mut merged.name, &overlay.name);
    replace_if_present(&mut merged.headline, &overlay.headline);
    replace_if_present(&mut merged.company, &overlay.company);
    replace_if_present(&mut merged.location, &overlay.location);
    replace_if_present(&mut merged.bio, &overlay.bio);
    replace_if_present(&mut merged.profile_image, &overlay.profile_image);
    replace_if_present(&mut merged.summary, &overlay.summary);

    if let Some(socials) = &overlay.socials {
        merge_socials(&mut merged.socials, socials);
    }

    if let Some(stats) = &overlay.github_stats {
        merge_stats(&mut merged.github_stats, stats);
    }

    if let Some(skills) = overlay.skills.as_ref().filter(|s| !s.is_empty()) {
        merged.skills = skills.clone();
    }

    if let Some(history) = overlay.work_history.as_ref().filter(|h| !h.is_empty()) {
        merged.work_history = history.clone();
    }

    merged
}

/// Folds the overlays left to right; later overlays win.
pub fn merge_all<'a, I>(base: Profile, overlays: I) -> Profile
where
    I: IntoIterator<Item = &'a PartialProfile>,
{
    overlays.into_iter().fold(base, merge)
}

fn replace_if_present(target: &mut String, value: &Option<String>) {
    if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
        *target = v.to_string();
    }
}

fn merge_socials(target: &mut Socials, overlay: &PartialSocials) {
    replace_if_present(&mut target.linkedin, &overlay.linkedin);
    replace_if_present(&mut target.github, &overlay.github);
    replace_if_present(&mut target.twitter, &overlay.twitter);
    replace_if_present(&mut target.website, &overlay.website);
}

fn merge_stats(target: &mut GithubStats, overlay: &PartialGithubStats) {
    // 有值就覆蓋，包含 0
    if let Some(repos) = overlay.repos {
        target.repos = repos;
    }
    if let Some(stars) = overlay.stars {
        target.stars = stars;
    }
    if let Some(followers) = overlay.followers {
        target.followers = followers;
    }
}
