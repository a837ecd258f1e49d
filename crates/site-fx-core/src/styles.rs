// Keyframes and helper rules injected once at startup, one sheet per variant.

pub static ENHANCED_CSS: &str = r#"
@keyframes confetti-fall {
    to {
        transform: translate(var(--dx), var(--dy)) rotate(720deg);
        opacity: 0;
    }
}

@keyframes spin {
    0% { transform: rotate(0deg); }
    100% { transform: rotate(360deg); }
}

@keyframes rainbow {
    0%, 100% { filter: hue-rotate(0deg); }
    50% { filter: hue-rotate(180deg); }
}

@keyframes float {
    0%, 100% { transform: translateY(0px); }
    50% { transform: translateY(-10px); }
}

.btn-ripple {
    position: absolute;
    border-radius: 50%;
    background: rgba(255, 255, 255, 0.3);
    transform: scale(0);
    animation: ripple 0.6s linear;
    pointer-events: none;
}

@keyframes ripple {
    to {
        transform: scale(2);
        opacity: 0;
    }
}

.form-group.focused input,
.form-group.focused select,
.form-group.focused textarea {
    border-color: #E53E3E !important;
    box-shadow: 0 0 0 3px rgba(229, 62, 62, 0.1) !important;
}

.form-group.completed input,
.form-group.completed select,
.form-group.completed textarea {
    border-color: #16A085 !important;
}

.form-group.field-error input,
.form-group.field-error select,
.form-group.field-error textarea {
    border-color: #E53E3E !important;
}

.animate-in {
    opacity: 1 !important;
    transform: translateY(0) !important;
}

.hero-content h1,
.tagline,
.hero-actions .btn,
.service-node {
    opacity: 0;
    transform: translateY(20px);
    transition: all 0.6s cubic-bezier(0.68, -0.55, 0.265, 1.55);
}

.service-node {
    transform: scale(0.8);
    transition: all 0.4s cubic-bezier(0.68, -0.55, 0.265, 1.55);
}

.service-card,
.tool-card,
.module-card,
.step,
.trend-item {
    opacity: 0;
    transform: translateY(30px);
    transition: all 0.6s ease;
}
"#;

pub static ELEGANT_CSS: &str = r#"
@keyframes advanced-ripple {
    to {
        transform: scale(2);
        opacity: 0;
    }
}

@keyframes constellation-line {
    to {
        transform: rotate(var(--angle)) scaleX(1);
    }
}

@keyframes confetti-fall {
    to {
        transform: translate(var(--dx), var(--dy)) rotate(720deg);
        opacity: 0;
    }
}

@keyframes enterprise-pulse {
    0%, 100% {
        box-shadow: 0 0 0 0 var(--gold);
        transform: scale(1);
    }
    50% {
        box-shadow: 0 0 0 20px transparent;
        transform: scale(1.05);
    }
}

.form-group.focused .form-label {
    color: var(--brand-red);
    transform: translateY(-2px);
    transition: all 0.3s cubic-bezier(0.25, 0.46, 0.45, 0.94);
}

.form-group.completed .form-input,
.form-group.completed .form-select,
.form-group.completed .form-textarea {
    border-color: var(--teal);
    background: linear-gradient(135deg, #ffffff 0%, #f0fdfa 100%);
}

.form-group.field-error .form-input,
.form-group.field-error .form-select,
.form-group.field-error .form-textarea {
    border-color: var(--brand-red);
}

.navbar {
    transition: transform 0.3s cubic-bezier(0.25, 0.46, 0.45, 0.94);
}

@media (prefers-reduced-motion: reduce) {
    * {
        animation-duration: 0.01ms !important;
        transition-duration: 0.01ms !important;
    }
}
"#;
