//! Base page layout.
//!
//! The page is rendered once in full; afterwards the inline script swaps the
//! status and posts regions with server-rendered fragments.

use maud::{html, Markup, PreEscaped, DOCTYPE};

const FONT_AWESOME_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css";

/// Polls the status fragment every second and swaps regions after actions.
/// Toast lifetimes on the client come from each toast's `data-remaining-ms`.
const PAGE_SCRIPT: &str = r#"(function() {
    function swap(id, html) {
        var el = document.getElementById(id);
        if (el) { el.outerHTML = html; }
    }

    async function refreshPostsRegion() {
        var res = await fetch('/fragments/posts');
        if (res.ok) { swap('posts-region', await res.text()); }
    }

    function scheduleExit(toast) {
        var remaining = parseInt(toast.dataset.remainingMs, 10) || 0;
        setTimeout(function() { toast.classList.remove('show'); }, Math.max(remaining - 300, 0));
        setTimeout(function() { toast.remove(); }, remaining);
    }

    // Toasts already on screen keep their nodes so transitions run; only
    // new ones are appended.
    function mergeToasts(box, fresh) {
        Array.prototype.slice.call(fresh.children).forEach(function(toast) {
            if (document.getElementById(toast.id)) { return; }
            toast.classList.remove('show');
            box.appendChild(toast);
            requestAnimationFrame(function() { toast.classList.add('show'); });
            scheduleExit(toast);
        });
    }

    async function refreshStatus() {
        try {
            var res = await fetch('/fragments/status');
            if (!res.ok) { return; }
            var tpl = document.createElement('template');
            tpl.innerHTML = (await res.text()).trim();
            var next = tpl.content.firstElementChild;
            var current = document.getElementById('status-region');
            if (!next || !current) { return; }

            var fresh = next.querySelector('.notifications');
            var box = current.querySelector('.notifications');
            if (fresh && box) { fresh.replaceWith(box); }
            current.replaceWith(next);
            if (fresh && box) { mergeToasts(box, fresh); }

            var posts = document.getElementById('posts-region');
            if (posts && next.dataset.revision !== posts.dataset.revision) {
                await refreshPostsRegion();
            }
        } catch (e) {
            console.error('Status update failed:', e);
        }
    }

    window.refreshPosts = async function() {
        var btn = document.getElementById('refresh-btn');
        if (btn) {
            btn.disabled = true;
            var icon = btn.querySelector('i');
            if (icon) { icon.className = 'fas fa-sync fa-spin'; }
        }
        try {
            var res = await fetch('/refresh', { method: 'POST' });
            if (res.ok) { swap('posts-region', await res.text()); }
        } finally {
            await refreshStatus();
        }
    };

    window.toggleFullContent = async function(id) {
        var res = await fetch('/posts/' + encodeURIComponent(id) + '/toggle', { method: 'POST' });
        if (!res.ok) { return; }
        swap('post-' + id, await res.text());
        var region = document.getElementById('posts-region');
        var revision = res.headers.get('X-Revision');
        if (region && revision) { region.dataset.revision = revision; }
        if (res.headers.get('X-Scroll-Into-View') === 'true') {
            var card = document.getElementById('post-' + id);
            var block = card && card.querySelector('.full-content');
            if (block) { block.scrollIntoView({ behavior: 'smooth', block: 'nearest' }); }
        }
    };

    window.copyToClipboard = async function(id) {
        try {
            await fetch('/posts/' + encodeURIComponent(id) + '/copy', { method: 'POST' });
        } finally {
            await refreshStatus();
        }
    };

    document.querySelectorAll('#status-region .notification').forEach(scheduleExit);
    setInterval(refreshStatus, 1000);
})();"#;

const PAGE_STYLE: &str = r"
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; background: #1C1C1E; color: #fff; }
    .container { max-width: 800px; margin: 0 auto; padding: 20px; }
    .stats-bar { display: flex; gap: 20px; align-items: center; flex-wrap: wrap; margin-bottom: 20px; }
    .stat-label { color: #8E8E93; }
    .post-card { background: rgba(255,255,255,0.05); border-radius: 12px; padding: 20px; margin: 16px 0; animation: reveal 0.4s ease both; }
    .post-header, .post-footer { display: flex; justify-content: space-between; color: #8E8E93; font-size: 0.9em; }
    .post-content { margin: 12px 0; line-height: 1.5; word-wrap: break-word; }
    .full-content { margin-top: 12px; padding-top: 12px; border-top: 1px solid rgba(255,255,255,0.1); }
    .post-actions { display: flex; gap: 10px; flex-wrap: wrap; }
    .post-link, .telegram-link { color: #007AFF; }
    .type-media { color: #FF9500; }
    .type-text { color: #34C759; }
    .error-message, .no-posts, .loading { text-align: center; padding: 30px; }
    .error-message { color: #FF3B30; }
    .notifications { position: fixed; top: 20px; right: 20px; z-index: 1000; }
    .notification { margin-bottom: 10px; padding: 15px 20px; border-radius: 10px; background: #000; color: #fff; border-left: 4px solid #007AFF; box-shadow: 0 5px 15px rgba(0,0,0,0.3); transform: translateX(120%); transition: transform 0.3s ease; max-width: 300px; }
    .notification.show { transform: translateX(0); }
    .notification.success { border-left-color: #4CD964; }
    .notification.error { border-left-color: #FF3B30; }
    .notification i { margin-right: 10px; }
    .stat-number.pulse { animation: pulse 0.5s ease; }
    @keyframes pulse { 0% { transform: scale(1); } 50% { transform: scale(1.1); } 100% { transform: scale(1); } }
    @keyframes reveal { from { opacity: 0; transform: translateY(10px); } to { opacity: 1; transform: none; } }
";

/// Base page layout builder.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::render::layout::BaseLayout;
///
/// let content = html! { h1 { "Hello World" } };
/// let page = BaseLayout::new("Channel Feed").render(content);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
    channel_url: Option<&'a str>,
}

impl<'a> BaseLayout<'a> {
    #[must_use]
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            channel_url: None,
        }
    }

    /// Link the header to the channel.
    #[must_use]
    pub fn with_channel(mut self, channel_url: &'a str) -> Self {
        self.channel_url = Some(channel_url);
        self
    }

    /// Render the complete HTML page with the given content.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (self.title) }
                    link rel="stylesheet" href=(FONT_AWESOME_CSS);
                    style { (PreEscaped(PAGE_STYLE)) }
                }
                body {
                    header class="container" {
                        h1 {
                            i class="fab fa-telegram" {}
                            " " (self.title)
                        }
                        @if let Some(channel_url) = self.channel_url {
                            a href=(channel_url) target="_blank" rel="noopener noreferrer" class="telegram-link" {
                                (channel_url)
                            }
                        }
                    }
                    main class="container" {
                        (content)
                    }
                    script { (PreEscaped(PAGE_SCRIPT)) }
                }
            }
        }
    }
}
